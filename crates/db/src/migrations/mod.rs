//! Database migrations.
//!
//! Schema migrations for the catalog and engagement tables.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_actor_table;
mod m20260101_000002_create_collection_tables;
mod m20260101_000003_create_variant_tables;
mod m20260101_000004_create_subject_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_actor_table::Migration),
            Box::new(m20260101_000002_create_collection_tables::Migration),
            Box::new(m20260101_000003_create_variant_tables::Migration),
            Box::new(m20260101_000004_create_subject_tables::Migration),
        ]
    }
}
