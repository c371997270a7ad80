//! Leaderboard query construction from untrusted client requests.

use super::validation::stat_path;
use crate::config::{Config, MAX_RECORDS};
use crate::storage::{Filter, FindOptions, SortOrder};
use statboard_types::request::LeaderboardRequest;

/// Fields every leaderboard row carries.
pub const ALWAYS_PROJECTED: [&str; 2] = ["name", "uuid"];
pub const ADVANCEMENTS_FIELD: &str = "advancements";

/// Record cap and the secret that lifts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLimits {
    pub max_records: usize,
    override_key: Option<String>,
}

impl QueryLimits {
    /// An empty override key is treated as unset.
    pub fn new(max_records: usize, override_key: Option<String>) -> Self {
        Self {
            max_records,
            override_key: override_key.filter(|key| !key.is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_records, config.limit_override_key.clone())
    }

    /// `None` (unbounded) only when `presented` matches the configured key.
    pub fn limit_for(&self, presented: &str) -> Option<usize> {
        match &self.override_key {
            Some(expected) if expected == presented => None,
            _ => Some(self.max_records),
        }
    }
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self::new(MAX_RECORDS, None)
    }
}

/// A sanitized filter plus find options, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardQuery {
    pub filter: Filter,
    pub options: FindOptions,
}

/// Builds the store query for a leaderboard request.
///
/// Client group/field names only ever reach the store through
/// [`stat_path`], which strips path separators and operator prefixes.
pub fn build_query(request: &LeaderboardRequest, limits: &QueryLimits) -> LeaderboardQuery {
    LeaderboardQuery {
        filter: make_filter(request),
        options: FindOptions {
            projection: Some(make_projection(request)),
            sort: make_sort(request),
            limit: limits.limit_for(&request.limit_expansion_key),
        },
    }
}

fn make_filter(request: &LeaderboardRequest) -> Filter {
    let mut filter = Filter::new();

    if !request.player_uuid.is_empty() {
        filter = filter.and("uuid", request.player_uuid.as_str());
    }

    if !request.player_name.is_empty() {
        filter = filter.and("name", request.player_name.as_str());
    }

    filter
}

fn make_projection(request: &LeaderboardRequest) -> Vec<String> {
    let mut projection: Vec<String> = ALWAYS_PROJECTED.iter().map(|f| f.to_string()).collect();

    if request.return_advancements {
        projection.push(ADVANCEMENTS_FIELD.to_string());
    }

    projection.extend(request.stats_filter.iter().filter_map(stat_path));
    projection
}

fn make_sort(request: &LeaderboardRequest) -> Option<(String, SortOrder)> {
    if !request.should_sort() {
        return None;
    }

    let path = stat_path(&request.sort.field)?;
    Some((path, SortOrder::from_value(request.sort.direction.value())))
}
