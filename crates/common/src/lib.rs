//! Common utilities and shared types for atelier.
//!
//! This crate provides foundational components used across all atelier crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based row identifiers via [`IdGenerator`]
//! - **Product codes**: EAN-13 checksummed variant codes via [`product_code`]
//! - **Media**: Durable media storage behind [`MediaStore`]
//!
//! # Example
//!
//! ```no_run
//! use atelier_common::{AppResult, Config, IdGenerator, product_code};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id = IdGenerator::new().generate();
//!     let code = product_code::generate("Azur", "Sky");
//!     println!("{} listening on {}, row {id}, code {code}", config.server.url, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod media;
pub mod product_code;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use media::{LocalMediaStore, MediaStore, StoredMedia, generate_media_key};
