//! Repository layer for database operations.

mod actor;
mod catalog_type;
mod collection;
mod engagement;
mod media;
mod stock;
mod subject;
mod variant;

pub use actor::ActorRepository;
pub use catalog_type::CatalogTypeRepository;
pub use collection::CollectionRepository;
pub use engagement::{EngagementRepository, SubjectEngagementCounts};
pub use media::VariantMediaRepository;
pub use stock::StockRepository;
pub use subject::SubjectRepository;
pub use variant::{AtomicUnit, CommittedUnit, VariantRepository};
