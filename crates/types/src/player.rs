use crate::stats::StatsDocument;
use serde::{Deserialize, Serialize};

/// A completed advancement as persisted.
///
/// Display metadata (tab, icon, title) is resolved by clients and never
/// stored, so inbound copies of it are dropped on decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Advancement {
    pub key: String,
}

impl Advancement {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self { key: key.into() }
    }
}

/// Advancement progress as reported by a game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementInput {
    pub key: String,
    #[serde(default)]
    pub done: bool,
}

impl AdvancementInput {
    pub fn new<S: Into<String>>(key: S, done: bool) -> Self {
        Self {
            key: key.into(),
            done,
        }
    }
}

/// One player within a server namespace.
///
/// `id` is assigned by the store and only ever read back; it is never sent
/// to clients nor written by us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: String,
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub stats: StatsDocument,
    #[serde(default)]
    pub advancements: Vec<Advancement>,
}
