//! Decision-to-status transition table for the Content domain
//!
//! A reviewer's decision maps onto a deterministic set of field writes per
//! entity kind. The mapping is a pure, total function: every (kind, decision)
//! pair produces exactly one transition, and applying the same transition
//! twice writes the same values (idempotent overwrite).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{EntityKind, PublishStatus};

/// A reviewer's verdict on a pending approval request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewDecision::Approved => write!(f, "APPROVED"),
            ReviewDecision::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Article-only publication flags driven by the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticlePublication {
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

/// The concrete field writes a decision produces for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishTransition {
    pub status: PublishStatus,
    /// Set for articles only; other kinds never touch publication flags
    pub article: Option<ArticlePublication>,
}

/// Compute the transition for a decision on an entity of the given kind.
///
/// APPROVED publishes, REJECTED returns the entity to draft. Articles
/// additionally flip `is_published` and stamp or clear `published_at`.
pub fn transition_for(
    kind: EntityKind,
    decision: ReviewDecision,
    now: DateTime<Utc>,
) -> PublishTransition {
    let status = match decision {
        ReviewDecision::Approved => PublishStatus::Publish,
        ReviewDecision::Rejected => PublishStatus::Draft,
    };

    let article = match (kind, decision) {
        (EntityKind::Article, ReviewDecision::Approved) => Some(ArticlePublication {
            is_published: true,
            published_at: Some(now),
        }),
        (EntityKind::Article, ReviewDecision::Rejected) => Some(ArticlePublication {
            is_published: false,
            published_at: None,
        }),
        _ => None,
    };

    PublishTransition { status, article }
}
