//! Engagement service (like and reaction toggles).

use std::collections::BTreeMap;

use atelier_common::{AppError, AppResult, IdGenerator};
use atelier_db::repositories::{EngagementRepository, SubjectRepository};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum number of Unicode code points in a reaction symbol.
pub const MAX_SYMBOL_CODEPOINTS: usize = 2;

/// Input for toggling a like.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeInput {
    pub subject_id: String,
}

/// Input for toggling a reaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReactionInput {
    pub subject_id: String,
    pub symbol: String,
}

/// Like state after a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggled {
    pub liked: bool,
    pub like_count: u64,
}

/// Reaction state after a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionToggled {
    pub active: bool,
    pub symbol: String,
    pub counts_by_symbol: BTreeMap<String, u64>,
}

/// Engagement summary of one subject as seen by an optional viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub like_count: u64,
    pub counts_by_symbol: BTreeMap<String, u64>,
    pub viewer_liked: bool,
    pub viewer_symbols: Vec<String>,
}

/// Service for likes and reactions on subjects.
#[derive(Clone)]
pub struct EngagementService {
    subject_repo: SubjectRepository,
    engagement_repo: EngagementRepository,
    id_gen: IdGenerator,
}

impl EngagementService {
    /// Create a new engagement service.
    #[must_use]
    pub const fn new(subject_repo: SubjectRepository, engagement_repo: EngagementRepository) -> Self {
        Self {
            subject_repo,
            engagement_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Flip the actor's like on a subject.
    pub async fn toggle_like(&self, subject_id: &str, actor_id: &str) -> AppResult<LikeToggled> {
        self.subject_repo.ensure_exists(subject_id).await?;

        let liked = self
            .engagement_repo
            .toggle_like(self.id_gen.generate(), subject_id, actor_id)
            .await?;
        let like_count = self.engagement_repo.like_count(subject_id).await?;

        debug!(subject_id, actor_id, liked, like_count, "Toggled like");
        Ok(LikeToggled { liked, like_count })
    }

    /// Flip one reaction symbol of the actor on a subject. Other symbols held
    /// by the same actor are untouched.
    pub async fn toggle_reaction(
        &self,
        subject_id: &str,
        actor_id: &str,
        symbol: &str,
    ) -> AppResult<ReactionToggled> {
        validate_symbol(symbol)?;
        self.subject_repo.ensure_exists(subject_id).await?;

        let active = self
            .engagement_repo
            .toggle_reaction(self.id_gen.generate(), subject_id, actor_id, symbol)
            .await?;
        let counts_by_symbol = self.engagement_repo.reaction_counts(subject_id).await?;

        debug!(subject_id, actor_id, symbol, active, "Toggled reaction");
        Ok(ReactionToggled {
            active,
            symbol: symbol.to_string(),
            counts_by_symbol,
        })
    }

    /// Counts across all actors, plus the viewer's own state when present.
    pub async fn get_engagement(
        &self,
        subject_id: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<Engagement> {
        self.subject_repo.ensure_exists(subject_id).await?;

        let like_count = self.engagement_repo.like_count(subject_id).await?;
        let counts_by_symbol = self.engagement_repo.reaction_counts(subject_id).await?;

        let (viewer_liked, viewer_symbols) = match viewer_id {
            Some(actor_id) => (
                self.engagement_repo.has_liked(subject_id, actor_id).await?,
                self.engagement_repo.actor_symbols(subject_id, actor_id).await?,
            ),
            None => (false, vec![]),
        };

        Ok(Engagement {
            like_count,
            counts_by_symbol,
            viewer_liked,
            viewer_symbols,
        })
    }
}

/// Check that a reaction symbol is non-empty, short and not padded.
pub fn validate_symbol(symbol: &str) -> AppResult<()> {
    let codepoints = symbol.chars().count();
    if codepoints == 0 || symbol.trim().is_empty() {
        return Err(AppError::Validation("Reaction symbol is empty".to_string()));
    }
    if symbol != symbol.trim() {
        return Err(AppError::Validation(
            "Reaction symbol has surrounding whitespace".to_string(),
        ));
    }
    if codepoints > MAX_SYMBOL_CODEPOINTS {
        return Err(AppError::Validation(format!(
            "Reaction symbol is limited to {MAX_SYMBOL_CODEPOINTS} code points"
        )));
    }
    Ok(())
}
