//! Database entities.

#![allow(missing_docs)]

pub mod actor;
pub mod catalog_type;
pub mod collection;
pub mod stock_record;
pub mod subject;
pub mod subject_like;
pub mod subject_reaction;
pub mod variant;
pub mod variant_media;

pub use actor::Entity as Actor;
pub use catalog_type::Entity as CatalogType;
pub use collection::Entity as Collection;
pub use stock_record::Entity as StockRecord;
pub use subject::Entity as Subject;
pub use subject_like::Entity as SubjectLike;
pub use subject_reaction::Entity as SubjectReaction;
pub use variant::Entity as Variant;
pub use variant_media::Entity as VariantMedia;
