//! Player statistics aggregation and leaderboard query engine.
//!
//! ## Features
//! - **Normalization**: every write is scaffolded to the closed set of stat
//!   groups, with a derived `totals` group (deaths, play time, blocks placed and
//!   broken, advancements done)
//! - **Safe queries**: client-chosen sort and projection fields are sanitized
//!   before they become store paths; reads are capped unless an override key
//!   matches
//! - **Upserts**: one conditional replace-or-insert per write, keyed by player
//!   UUID within a `server_season` namespace
//! - **Persistence**: optional snapshots of the in-memory store
//!
//! ```rust
//! use statboard::StatsDB;
//! use statboard_types::request::{LeaderboardRequest, ServerIdentifier, UpdatePlayerRequest};
//!
//! let db = StatsDB::memory();
//! let write: UpdatePlayerRequest = serde_json::from_str(r#"{
//!     "server": {"serverName": "survival", "season": 1},
//!     "uuid": "069a79f4-44e9-4726-a5be-fca90e38aaf5",
//!     "name": "Notch",
//!     "stats": {"mined": {"minecraft:stone": 64}},
//!     "advancements": [{"key": "minecraft:story/mine_stone", "done": true}]
//! }"#)?;
//! let player = db.upsert_player(write)?;
//! assert_eq!(player.advancements.len(), 1);
//!
//! let read = LeaderboardRequest {
//!     server: ServerIdentifier::new("survival", 1),
//!     ..Default::default()
//! };
//! let rows = db.leaderboard(&read)?;
//! assert_eq!(rows[0]["name"], "Notch");
//! # Ok::<(), statboard::StatsError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod db;
pub mod error;
pub mod storage;

pub use builder::StatsDBBuilder;
pub use db::StatsDB;
pub use error::{Result, StatsError};

pub use config::{Config, MAX_RECORDS};

pub use compute::aggregate::{Normalized, normalize};
pub use compute::blocks::{AnyKey, BlockClassifier, BlockList};
pub use compute::query::{LeaderboardQuery, QueryLimits, build_query};

pub use storage::{
    Document, DocumentStore, Filter, FindOptions, MemoryBackend, SnapshotConfig, SnapshotFile,
    SortOrder, StorageStats,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Result, StatsDB, StatsDBBuilder, StatsError};

    pub use crate::{BlockClassifier, BlockList, Config};

    pub use crate::{DocumentStore, MemoryBackend};

    pub use statboard_types::player::{Advancement, AdvancementInput, PlayerRecord};
    pub use statboard_types::request::{LeaderboardRequest, ServerIdentifier, UpdatePlayerRequest};
    pub use statboard_types::stats::{StatGroup, StatsDocument};
}
