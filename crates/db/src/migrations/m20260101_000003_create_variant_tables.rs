//! Create variant, stock record and variant media tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Variant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Variant::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Variant::CollectionId).string_len(32).not_null())
                    .col(ColumnDef::new(Variant::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Variant::NameAr).string_len(256).null())
                    .col(ColumnDef::new(Variant::ColorCode).string_len(32).null())
                    .col(ColumnDef::new(Variant::Price).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Variant::Discount).decimal_len(12, 2).null())
                    .col(
                        ColumnDef::new(Variant::Code)
                            .string_len(13)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Variant::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Variant::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Variant::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Variant::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variant_collection")
                            .from(Variant::Table, Variant::CollectionId)
                            .to(Collection::Table, Collection::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_variant_collection_id")
                    .table(Variant::Table)
                    .col(Variant::CollectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockRecord::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StockRecord::VariantId)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StockRecord::Available)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StockRecord::Reserved)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StockRecord::ReorderPoint)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StockRecord::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_record_variant")
                            .from(StockRecord::Table, StockRecord::VariantId)
                            .to(Variant::Table, Variant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VariantMedia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VariantMedia::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VariantMedia::VariantId).string_len(32).not_null())
                    .col(ColumnDef::new(VariantMedia::Url).string_len(1024).not_null())
                    .col(ColumnDef::new(VariantMedia::Position).integer().not_null())
                    .col(
                        ColumnDef::new(VariantMedia::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variant_media_variant")
                            .from(VariantMedia::Table, VariantMedia::VariantId)
                            .to(Variant::Table, Variant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (variant_id, position) for ordered media and cover lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_variant_media_variant_position")
                    .table(VariantMedia::Table)
                    .col(VariantMedia::VariantId)
                    .col(VariantMedia::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VariantMedia::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StockRecord::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Variant::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Variant {
    Table,
    Id,
    CollectionId,
    Name,
    NameAr,
    ColorCode,
    Price,
    Discount,
    Code,
    IsActive,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StockRecord {
    Table,
    Id,
    VariantId,
    Available,
    Reserved,
    ReorderPoint,
    UpdatedAt,
}

#[derive(Iden)]
enum VariantMedia {
    Table,
    Id,
    VariantId,
    Url,
    Position,
    CreatedAt,
}

#[derive(Iden)]
enum Collection {
    Table,
    Id,
}
