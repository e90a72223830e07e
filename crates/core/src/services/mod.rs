//! Business logic services.

#![allow(missing_docs)]

pub mod engagement;
pub mod feed;
pub mod identity;
pub mod subject;
pub mod variant;

pub use engagement::{
    Engagement, EngagementService, LikeToggled, ReactionToggled, ToggleLikeInput,
    ToggleReactionInput,
};
pub use feed::{FeedItem, FeedQuery, FeedService, FeedVariant};
pub use identity::{ActorIdentityProvider, IdentityProvider};
pub use subject::{CreateSubjectInput, SubjectService};
pub use variant::{
    CreateCollectionInput, CreateVariantInput, CreatedCollection, CreatedVariant,
    ProvisionOutcome, ProvisioningPlan, SideWrite, StockLevels, UpdateStockInput, VariantDetail,
    VariantInput, VariantService,
};
