//! Variant entity (one color or flavor of a collection).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "variant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub collection_id: String,

    pub name: String,

    #[sea_orm(nullable)]
    pub name_ar: Option<String>,

    /// Visual code, e.g. "#1E90FF".
    #[sea_orm(nullable)]
    pub color_code: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,

    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub discount: Option<Decimal>,

    /// 13-digit EAN-13 style product code.
    #[sea_orm(unique)]
    pub code: String,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(default_value = 0)]
    pub sort_order: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collection::Entity",
        from = "Column::CollectionId",
        to = "super::collection::Column::Id",
        on_delete = "Cascade"
    )]
    Collection,
    #[sea_orm(has_one = "super::stock_record::Entity")]
    StockRecord,
    #[sea_orm(has_many = "super::variant_media::Entity")]
    VariantMedia,
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl Related<super::stock_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockRecord.def()
    }
}

impl Related<super::variant_media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VariantMedia.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
