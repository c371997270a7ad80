//! # statboard-types
//!
//! Core player statistics types for the Statboard leaderboard service.
//!
//! - **Stats**: `StatGroup`, `Counter`, `CounterMap`, `StatsDocument`
//! - **Players**: `PlayerRecord`, `Advancement`, `AdvancementInput`
//! - **Requests**: `LeaderboardRequest`, `UpdatePlayerRequest`, `ServerIdentifier`
//!
//! All types are serializable with Serde and use the camelCase wire names game
//! servers send.
//!
//! ## Examples
//!
//! ```rust
//! use statboard_types::stats::{StatGroup, StatsDocument};
//!
//! let stats: StatsDocument = serde_json::from_str(r#"{"mined": {"minecraft:stone": 10}}"#)?;
//! assert_eq!(stats.group(StatGroup::Mined).sum_where(|_| true), 10);
//! assert!(stats.group(StatGroup::Used).is_empty());
//! # Ok::<(), serde_json::Error>(())
//! ```

pub mod player;
pub mod request;
pub mod stats;
