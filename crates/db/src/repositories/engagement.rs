//! Engagement repository (likes and reactions on subjects).
//!
//! Toggles never read before writing. The insert carries
//! `ON CONFLICT DO NOTHING` against the edge's unique index; when no row was
//! inserted the edge already existed and is deleted instead. Two concurrent
//! togglers therefore never surface a unique violation.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::db_error;
use crate::entities::{SubjectLike, SubjectReaction, subject_like, subject_reaction};
use atelier_common::AppResult;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::OnConflict,
};
use tracing::debug;

/// Like and reaction counts for one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectEngagementCounts {
    /// Number of like edges.
    pub like_count: u64,
    /// Reaction edges per symbol.
    pub counts_by_symbol: BTreeMap<String, u64>,
}

#[derive(FromQueryResult)]
struct SymbolCount {
    symbol: String,
    count: i64,
}

#[derive(FromQueryResult)]
struct SubjectCount {
    subject_id: String,
    count: i64,
}

#[derive(FromQueryResult)]
struct SubjectSymbolCount {
    subject_id: String,
    symbol: String,
    count: i64,
}

/// Engagement repository for database operations.
#[derive(Clone)]
pub struct EngagementRepository {
    db: Arc<DatabaseConnection>,
}

impl EngagementRepository {
    /// Create a new engagement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Flip the like edge for (subject, actor). Returns whether it now exists.
    ///
    /// `id` is only used when a new edge is inserted.
    pub async fn toggle_like(&self, id: String, subject_id: &str, actor_id: &str) -> AppResult<bool> {
        let edge = subject_like::ActiveModel {
            id: Set(id),
            subject_id: Set(subject_id.to_string()),
            actor_id: Set(actor_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = SubjectLike::insert(edge)
            .on_conflict(
                OnConflict::columns([
                    subject_like::Column::SubjectId,
                    subject_like::Column::ActorId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(db_error)?;

        if inserted > 0 {
            return Ok(true);
        }

        let deleted = SubjectLike::delete_many()
            .filter(subject_like::Column::SubjectId.eq(subject_id))
            .filter(subject_like::Column::ActorId.eq(actor_id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;

        debug!(subject_id, actor_id, rows = deleted.rows_affected, "Like removed");
        Ok(false)
    }

    /// Flip the reaction edge for (subject, actor, symbol).
    pub async fn toggle_reaction(
        &self,
        id: String,
        subject_id: &str,
        actor_id: &str,
        symbol: &str,
    ) -> AppResult<bool> {
        let edge = subject_reaction::ActiveModel {
            id: Set(id),
            subject_id: Set(subject_id.to_string()),
            actor_id: Set(actor_id.to_string()),
            symbol: Set(symbol.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = SubjectReaction::insert(edge)
            .on_conflict(
                OnConflict::columns([
                    subject_reaction::Column::SubjectId,
                    subject_reaction::Column::ActorId,
                    subject_reaction::Column::Symbol,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(db_error)?;

        if inserted > 0 {
            return Ok(true);
        }

        SubjectReaction::delete_many()
            .filter(subject_reaction::Column::SubjectId.eq(subject_id))
            .filter(subject_reaction::Column::ActorId.eq(actor_id))
            .filter(subject_reaction::Column::Symbol.eq(symbol))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(false)
    }

    /// Number of likes on a subject.
    pub async fn like_count(&self, subject_id: &str) -> AppResult<u64> {
        SubjectLike::find()
            .filter(subject_like::Column::SubjectId.eq(subject_id))
            .count(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Whether the actor likes the subject.
    pub async fn has_liked(&self, subject_id: &str, actor_id: &str) -> AppResult<bool> {
        let count = SubjectLike::find()
            .filter(subject_like::Column::SubjectId.eq(subject_id))
            .filter(subject_like::Column::ActorId.eq(actor_id))
            .count(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(count > 0)
    }

    /// Reaction counts on a subject, keyed by symbol.
    pub async fn reaction_counts(&self, subject_id: &str) -> AppResult<BTreeMap<String, u64>> {
        let rows = SubjectReaction::find()
            .select_only()
            .column(subject_reaction::Column::Symbol)
            .column_as(subject_reaction::Column::Id.count(), "count")
            .filter(subject_reaction::Column::SubjectId.eq(subject_id))
            .group_by(subject_reaction::Column::Symbol)
            .into_model::<SymbolCount>()
            .all(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .map(|r| (r.symbol, r.count as u64))
            .collect())
    }

    /// Symbols the actor currently holds on a subject, oldest first.
    pub async fn actor_symbols(&self, subject_id: &str, actor_id: &str) -> AppResult<Vec<String>> {
        let rows = SubjectReaction::find()
            .filter(subject_reaction::Column::SubjectId.eq(subject_id))
            .filter(subject_reaction::Column::ActorId.eq(actor_id))
            .order_by_asc(subject_reaction::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(|r| r.symbol).collect())
    }

    /// Like and reaction counts for many subjects in two grouped queries.
    ///
    /// Subjects without any edge are absent from the map.
    pub async fn counts_for(
        &self,
        subject_ids: &[String],
    ) -> AppResult<HashMap<String, SubjectEngagementCounts>> {
        let mut counts: HashMap<String, SubjectEngagementCounts> = HashMap::new();
        if subject_ids.is_empty() {
            return Ok(counts);
        }

        let likes = SubjectLike::find()
            .select_only()
            .column(subject_like::Column::SubjectId)
            .column_as(subject_like::Column::Id.count(), "count")
            .filter(subject_like::Column::SubjectId.is_in(subject_ids.to_vec()))
            .group_by(subject_like::Column::SubjectId)
            .into_model::<SubjectCount>()
            .all(self.db.as_ref())
            .await
            .map_err(db_error)?;

        for row in likes {
            counts.entry(row.subject_id).or_default().like_count = row.count as u64;
        }

        let reactions = SubjectReaction::find()
            .select_only()
            .column(subject_reaction::Column::SubjectId)
            .column(subject_reaction::Column::Symbol)
            .column_as(subject_reaction::Column::Id.count(), "count")
            .filter(subject_reaction::Column::SubjectId.is_in(subject_ids.to_vec()))
            .group_by(subject_reaction::Column::SubjectId)
            .group_by(subject_reaction::Column::Symbol)
            .into_model::<SubjectSymbolCount>()
            .all(self.db.as_ref())
            .await
            .map_err(db_error)?;

        for row in reactions {
            counts
                .entry(row.subject_id)
                .or_default()
                .counts_by_symbol
                .insert(row.symbol, row.count as u64);
        }

        Ok(counts)
    }

    /// Which of the given subjects the actor likes.
    pub async fn liked_subjects(
        &self,
        subject_ids: &[String],
        actor_id: &str,
    ) -> AppResult<HashSet<String>> {
        if subject_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = SubjectLike::find()
            .filter(subject_like::Column::SubjectId.is_in(subject_ids.to_vec()))
            .filter(subject_like::Column::ActorId.eq(actor_id))
            .all(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(|r| r.subject_id).collect())
    }

    /// Symbols the actor holds on each of the given subjects.
    pub async fn actor_symbols_for(
        &self,
        subject_ids: &[String],
        actor_id: &str,
    ) -> AppResult<HashMap<String, Vec<String>>> {
        let mut symbols: HashMap<String, Vec<String>> = HashMap::new();
        if subject_ids.is_empty() {
            return Ok(symbols);
        }

        let rows = SubjectReaction::find()
            .filter(subject_reaction::Column::SubjectId.is_in(subject_ids.to_vec()))
            .filter(subject_reaction::Column::ActorId.eq(actor_id))
            .order_by_asc(subject_reaction::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)?;

        for row in rows {
            symbols.entry(row.subject_id).or_default().push(row.symbol);
        }
        Ok(symbols)
    }
}
