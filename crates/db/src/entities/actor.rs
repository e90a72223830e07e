//! Actor entity (an authenticated identity that likes and reacts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "actor")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Bearer token issued by the identity provider.
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub token: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subject_like::Entity")]
    SubjectLike,
    #[sea_orm(has_many = "super::subject_reaction::Entity")]
    SubjectReaction,
}

impl Related<super::subject_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectLike.def()
    }
}

impl Related<super::subject_reaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectReaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
