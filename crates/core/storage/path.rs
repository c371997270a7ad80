//! Dotted field paths over JSON documents.

use super::Document;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::cmp::Ordering;

type Segments<'a> = SmallVec<[&'a str; 4]>;

fn segments(path: &str) -> Segments<'_> {
    path.split('.').collect()
}

/// Resolve a dotted path (`stats.mined.minecraft:stone`) inside a document.
pub fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let segments = segments(path);
    let (first, rest) = segments.split_first()?;

    let mut current = document.get(*first)?;
    for segment in rest {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

/// Keep only the given dotted paths of a document, preserving nesting.
/// Paths that do not resolve are left out.
pub fn project(document: &Document, paths: &[String]) -> Document {
    let mut projected = Map::new();

    for path in paths {
        if let Some(value) = lookup(document, path) {
            insert_path(&mut projected, &segments(path), value.clone());
        }
    }

    projected
}

fn insert_path(target: &mut Document, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            target.insert((*last).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = target
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

/// Total order used for sorting: missing < null < bool < number < string <
/// array < object. Values of the same kind compare naturally; arrays and
/// objects compare equal.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(0.0);
                let y = y.as_f64().unwrap_or(0.0);
                x.total_cmp(&y)
            }
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_lookup_nested() {
        let d = doc(json!({"stats": {"mined": {"minecraft:stone": 10}}, "name": "Bob"}));
        assert_eq!(lookup(&d, "name"), Some(&json!("Bob")));
        assert_eq!(lookup(&d, "stats.mined.minecraft:stone"), Some(&json!(10)));
        assert_eq!(lookup(&d, "stats.used.minecraft:dirt"), None);
        assert_eq!(lookup(&d, "name.first"), None);
    }

    #[test]
    fn test_project_keeps_nesting() {
        let d = doc(json!({
            "_id": "x",
            "uuid": "u1",
            "name": "Bob",
            "stats": {"mined": {"a": 1, "b": 2}, "used": {"c": 3}}
        }));
        let projected = project(
            &d,
            &["uuid".into(), "stats.mined.b".into(), "stats.used.c".into(), "missing".into()],
        );

        assert_eq!(
            Value::Object(projected),
            json!({"uuid": "u1", "stats": {"mined": {"b": 2}, "used": {"c": 3}}})
        );
    }

    #[test]
    fn test_compare_values_ordering() {
        let ten = json!(10);
        let two = json!(2.0);
        let text = json!("a");
        assert_eq!(compare_values(Some(&two), Some(&ten)), Ordering::Less);
        assert_eq!(compare_values(None, Some(&two)), Ordering::Less);
        assert_eq!(compare_values(Some(&text), Some(&ten)), Ordering::Greater);
        assert_eq!(compare_values(None, None), Ordering::Equal);
    }
}
