//! Inbound request shapes for leaderboard reads and player writes.

use crate::player::AdvancementInput;
use crate::stats::StatsDocument;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server name plus season; selects the collection a player lives in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerIdentifier {
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub season: i64,
}

impl ServerIdentifier {
    pub fn new<S: Into<String>>(server_name: S, season: i64) -> Self {
        Self {
            server_name: server_name.into(),
            season,
        }
    }
}

impl fmt::Display for ServerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.server_name, self.season)
    }
}

/// A group/field pair naming one counter, as chosen by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatField {
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub field_name: String,
}

impl StatField {
    pub fn new<G: Into<String>, F: Into<String>>(group_name: G, field_name: F) -> Self {
        Self {
            group_name: group_name.into(),
            field_name: field_name.into(),
        }
    }

    pub fn is_set(&self) -> bool {
        !self.group_name.is_empty() && !self.field_name.is_empty()
    }
}

/// Sort direction; anything other than `ascending` sorts descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    #[serde(other)]
    Descending,
}

impl SortDirection {
    /// Store sort order: `1` ascending, `-1` descending.
    pub const fn value(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    #[serde(default)]
    pub field: StatField,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Leaderboard read request. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaderboardRequest {
    pub sort: SortOptions,
    pub server: ServerIdentifier,
    #[serde(rename = "playerUUID")]
    pub player_uuid: String,
    pub player_name: String,
    #[serde(rename = "filter")]
    pub stats_filter: Vec<StatField>,
    pub return_advancements: bool,
    /// Lifts the record cap when it matches the configured override secret.
    pub limit_expansion_key: String,
}

impl LeaderboardRequest {
    pub fn should_sort(&self) -> bool {
        self.sort.field.is_set()
    }
}

/// Full player write: replaces the stored stats and advancements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlayerRequest {
    #[serde(default)]
    pub server: ServerIdentifier,
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stats: StatsDocument,
    #[serde(default)]
    pub advancements: Vec<AdvancementInput>,
}
