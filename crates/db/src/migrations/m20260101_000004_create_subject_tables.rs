//! Create subject, subject like and subject reaction tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subject::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subject::CollectionId).string_len(32).not_null())
                    .col(ColumnDef::new(Subject::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Subject::Description).text().null())
                    .col(ColumnDef::new(Subject::VideoUrl).string_len(1024).null())
                    .col(
                        ColumnDef::new(Subject::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Subject::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Subject::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_collection")
                            .from(Subject::Table, Subject::CollectionId)
                            .to(Collection::Table, Collection::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subject_collection_id")
                    .table(Subject::Table)
                    .col(Subject::CollectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubjectLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubjectLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SubjectLike::SubjectId).string_len(32).not_null())
                    .col(ColumnDef::new(SubjectLike::ActorId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(SubjectLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_like_subject")
                            .from(SubjectLike::Table, SubjectLike::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_like_actor")
                            .from(SubjectLike::Table, SubjectLike::ActorId)
                            .to(Actor::Table, Actor::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (subject_id, actor_id) - one like per actor per subject
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_like_subject_actor")
                    .table(SubjectLike::Table)
                    .col(SubjectLike::SubjectId)
                    .col(SubjectLike::ActorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubjectReaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubjectReaction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubjectReaction::SubjectId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubjectReaction::ActorId).string_len(32).not_null())
                    .col(ColumnDef::new(SubjectReaction::Symbol).string_len(32).not_null())
                    .col(
                        ColumnDef::new(SubjectReaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_reaction_subject")
                            .from(SubjectReaction::Table, SubjectReaction::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_reaction_actor")
                            .from(SubjectReaction::Table, SubjectReaction::ActorId)
                            .to(Actor::Table, Actor::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (subject_id, actor_id, symbol) - one row per symbol per actor
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_reaction_subject_actor_symbol")
                    .table(SubjectReaction::Table)
                    .col(SubjectReaction::SubjectId)
                    .col(SubjectReaction::ActorId)
                    .col(SubjectReaction::Symbol)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubjectReaction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubjectLike::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Subject {
    Table,
    Id,
    CollectionId,
    Title,
    Description,
    VideoUrl,
    IsActive,
    SortOrder,
    CreatedAt,
}

#[derive(Iden)]
enum SubjectLike {
    Table,
    Id,
    SubjectId,
    ActorId,
    CreatedAt,
}

#[derive(Iden)]
enum SubjectReaction {
    Table,
    Id,
    SubjectId,
    ActorId,
    Symbol,
    CreatedAt,
}

#[derive(Iden)]
enum Collection {
    Table,
    Id,
}

#[derive(Iden)]
enum Actor {
    Table,
    Id,
}
