//! Sanitization of client-chosen field names and namespace validation.

use crate::error::{Result, StatsError};
use statboard_types::request::{ServerIdentifier, StatField};

/// Root of every client-addressable stat path.
pub const STATS_ROOT: &str = "stats";

/// Characters that could change how the store interprets a path: the path
/// separator, the operator prefix, and NUL.
const RESERVED: [char; 3] = ['.', '$', '\0'];

/// Longest accepted collection name.
const MAX_NAMESPACE_LEN: usize = 255;

/// Removes every reserved character from a client-supplied name.
///
/// # Examples
///
/// ```
/// use statboard::compute::validation::sanitize_segment;
///
/// assert_eq!(sanitize_segment("mined"), "mined");
/// assert_eq!(sanitize_segment("$where.x$"), "wherex");
/// ```
pub fn sanitize_segment(name: &str) -> String {
    name.chars().filter(|c| !RESERVED.contains(c)).collect()
}

/// Builds `stats.<group>.<field>` from sanitized names.
///
/// Returns `None` when either name is empty after sanitization, so a client
/// can never address anything outside a stat group.
///
/// ```
/// use statboard::compute::validation::stat_path;
/// use statboard_types::request::StatField;
///
/// let field = StatField::new("mined", "minecraft:stone");
/// assert_eq!(stat_path(&field).as_deref(), Some("stats.mined.minecraft:stone"));
///
/// let hostile = StatField::new("..", "$gt");
/// assert_eq!(stat_path(&hostile), None);
/// ```
pub fn stat_path(field: &StatField) -> Option<String> {
    let group = sanitize_segment(&field.group_name);
    let name = sanitize_segment(&field.field_name);

    if group.is_empty() || name.is_empty() {
        return None;
    }

    Some(format!("{}.{}.{}", STATS_ROOT, group, name))
}

/// Validates a server identifier and returns its collection name.
pub fn collection_name(server: &ServerIdentifier) -> Result<String> {
    let name = &server.server_name;

    if name.is_empty() {
        return Err(StatsError::InvalidInput("Server name cannot be empty".into()));
    }

    if name.contains('\0') || name.contains('$') {
        return Err(StatsError::InvalidInput(format!(
            "Server name '{}' contains reserved characters",
            name.escape_default()
        )));
    }

    let collection = server.to_string();
    if collection.len() > MAX_NAMESPACE_LEN {
        return Err(StatsError::InvalidInput(format!(
            "Namespace cannot exceed {} characters",
            MAX_NAMESPACE_LEN
        )));
    }

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_every_occurrence() {
        assert_eq!(sanitize_segment("a.b.c"), "abc");
        assert_eq!(sanitize_segment("$$x$"), "x");
        assert_eq!(sanitize_segment("minecraft:stone"), "minecraft:stone");
        assert_eq!(sanitize_segment("nul\0byte"), "nulbyte");
    }

    #[test]
    fn test_stat_path_never_contains_reserved_input() {
        let field = StatField::new("mined.$ne", "x.$gt.y");
        let path = stat_path(&field).unwrap();
        assert_eq!(path, "stats.minedne.xgty");
        assert!(!path.contains('$'));
        assert_eq!(path.matches('.').count(), 2);
    }

    #[test]
    fn test_stat_path_rejects_empty() {
        assert!(stat_path(&StatField::new("", "deaths")).is_none());
        assert!(stat_path(&StatField::new("totals", "...")).is_none());
    }

    #[test]
    fn test_collection_name() {
        assert_eq!(
            collection_name(&ServerIdentifier::new("survival", 3)).unwrap(),
            "survival_3"
        );
        assert!(matches!(
            collection_name(&ServerIdentifier::new("", 1)),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(collection_name(&ServerIdentifier::new("$cmd", 1)).is_err());
        assert!(collection_name(&ServerIdentifier::new("x".repeat(300), 1)).is_err());
    }
}
