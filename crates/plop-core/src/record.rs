//! Event log records and context registry entries.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Placeholder actor name used when the profile lookup fails.
pub const UNKNOWN_USER_NAME: &str = "未知使用者";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Where an inbound message came from. Leaderboard filtering keeps the
/// three kinds distinct; only the registry collapses rooms into groups.
pub enum ContextKind {
    User,
    Group,
    Room,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Room => "room",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            "room" => Ok(Self::Room),
            other => bail!("unknown context kind '{other}'"),
        }
    }

    /// True for group and room contexts, where the noise-suppression gate
    /// applies.
    pub fn is_shared(&self) -> bool {
        !matches!(self, Self::User)
    }
}

/// One appended log entry. Immutable once written; every query is a pure
/// reduction over the full set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub actor_name: String,
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS` in the configured tz.
    pub timestamp: String,
    /// The literal trigger text that produced this record.
    pub label: String,
    pub context_kind: ContextKind,
    pub context_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Broadcast-facing context kind. Coarser than [`ContextKind`]: rooms are
/// registered as `Group` so they receive group-style reminders.
pub enum RegistryKind {
    User,
    Group,
}

impl RegistryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            other => bail!("unknown registry kind '{other}'"),
        }
    }
}

impl From<ContextKind> for RegistryKind {
    fn from(kind: ContextKind) -> Self {
        match kind {
            ContextKind::User => Self::User,
            ContextKind::Group | ContextKind::Room => Self::Group,
        }
    }
}

/// One row of the push-broadcast registry. First registration wins; entries
/// are never updated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub context_id: String,
    pub kind: RegistryKind,
}
