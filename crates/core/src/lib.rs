//! Core business logic for atelier.
//!
//! Services here own validation, the provisioning atomicity boundary and the
//! engagement toggles. Persistence lives in `atelier-db`.

pub mod services;

pub use services::*;
