//! Activity log entries and the client-side view over them.
//!
//! The server appends one row per mutation. The client never derives
//! state from these rows; it only filters them and orders them
//! newest-first for display.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{EntityId, Timestamp};

/// What happened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// What it happened to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Collection,
    Record,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Record => "record",
        }
    }
}

/// One appended audit row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub id: EntityId,
    pub user_id: EntityId,
    pub action: ActivityAction,
    pub entity_type: EntityKind,
    pub entity_id: EntityId,
    /// Free-form context the server chose to record, e.g. the new name.
    #[serde(default)]
    pub changes: Option<Value>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
}

/// Order entries newest-first.
///
/// The sort is stable, so entries sharing a timestamp keep the order the
/// server returned them in.
pub fn sort_newest_first(entries: &mut [ActivityEntry]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Optional narrowing criteria for the activity feed.
///
/// Mirrors the server's query parameters; [`ActivityFilter::matches`]
/// applies the same predicate locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityFilter {
    pub entity_type: Option<EntityKind>,
    pub action: Option<ActivityAction>,
    pub limit: Option<u32>,
}

impl ActivityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity_type(mut self, kind: EntityKind) -> Self {
        self.entity_type = Some(kind);
        self
    }

    pub fn action(mut self, action: ActivityAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether an entry satisfies every set criterion (`limit` aside).
    pub fn matches(&self, entry: &ActivityEntry) -> bool {
        self.entity_type.map_or(true, |k| entry.entity_type == k)
            && self.action.map_or(true, |a| entry.action == a)
    }

    /// Query-string pairs for the `GET /activity` request.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(kind) = self.entity_type {
            pairs.push(("entity_type", kind.as_str().to_string()));
        }
        if let Some(action) = self.action {
            pairs.push(("action", action.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}
