//! Pending recommendation slots.
//!
//! Each identity holds at most one outstanding introduction suggestion. A
//! new proposal replaces the previous one; a confirmation consumes it.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

/// A suggested introduction waiting for the user's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    /// Identity being introduced.
    pub candidate_id: String,
    /// Display name used in the confirmation reply.
    pub candidate_name: String,
    /// When the recommendation was made.
    pub proposed_at: DateTime<Utc>,
}

impl Recommendation {
    /// Create a recommendation proposed now.
    pub fn new(candidate_id: impl Into<String>, candidate_name: impl Into<String>) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            candidate_name: candidate_name.into(),
            proposed_at: Utc::now(),
        }
    }
}

/// One pending recommendation per identity.
#[derive(Debug, Default)]
pub struct RecommendationSlots {
    slots: DashMap<String, Recommendation>,
}

impl RecommendationSlots {
    /// Create an empty set of slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `recommendation` for `identity`, returning the one it replaced.
    pub fn propose(&self, identity: &str, recommendation: Recommendation) -> Option<Recommendation> {
        debug!(
            identity = %identity,
            candidate = %recommendation.candidate_id,
            "Recommendation proposed"
        );
        self.slots.insert(identity.to_string(), recommendation)
    }

    /// Remove and return the pending recommendation for `identity`.
    ///
    /// Removal is a single map operation, so concurrent confirmations
    /// cannot both consume the same recommendation.
    pub fn take(&self, identity: &str) -> Option<Recommendation> {
        self.slots.remove(identity).map(|(_, rec)| rec)
    }

    /// Current pending recommendation, without consuming it.
    pub fn peek(&self, identity: &str) -> Option<Recommendation> {
        self.slots.get(identity).map(|rec| rec.value().clone())
    }

    /// Number of identities with a pending recommendation.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no recommendation is pending.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
