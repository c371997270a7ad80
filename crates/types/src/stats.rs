//! Stat groups, counters and the canonical stats document.

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of stat groups a stats document always carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatGroup {
    Broken,
    Crafted,
    Custom,
    Dropped,
    KilledBy,
    Killed,
    Mined,
    PickedUp,
    Used,
    /// Synthetic group derived from the others on every write.
    Totals,
}

impl StatGroup {
    pub const ALL: [StatGroup; 10] = [
        StatGroup::Broken,
        StatGroup::Crafted,
        StatGroup::Custom,
        StatGroup::Dropped,
        StatGroup::KilledBy,
        StatGroup::Killed,
        StatGroup::Mined,
        StatGroup::PickedUp,
        StatGroup::Used,
        StatGroup::Totals,
    ];

    /// Canonical name used on the wire and as the stored field name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StatGroup::Broken => "broken",
            StatGroup::Crafted => "crafted",
            StatGroup::Custom => "custom",
            StatGroup::Dropped => "dropped",
            StatGroup::KilledBy => "killed_by",
            StatGroup::Killed => "killed",
            StatGroup::Mined => "mined",
            StatGroup::PickedUp => "picked_up",
            StatGroup::Used => "used",
            StatGroup::Totals => "totals",
        }
    }

    /// Resolves a group from its canonical name or its namespaced form
    /// (`minecraft:mined`, `bortexel:totals`).
    ///
    /// ```
    /// use statboard_types::stats::StatGroup;
    ///
    /// assert_eq!(StatGroup::from_name("mined"), Some(StatGroup::Mined));
    /// assert_eq!(StatGroup::from_name("minecraft:used"), Some(StatGroup::Used));
    /// assert_eq!(StatGroup::from_name("helpers"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = match name.split_once(':') {
            Some(("minecraft", rest)) => rest,
            Some(("bortexel", "totals")) => "totals",
            Some(_) => return None,
            None => name,
        };

        Self::ALL.into_iter().find(|group| group.as_str() == bare)
    }
}

impl fmt::Display for StatGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single counter value.
///
/// The wire format does not distinguish integers from floats, so decoding
/// accepts any number with no fractional part and rejects everything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Counter(pub i64);

impl Counter {
    pub const ZERO: Counter = Counter(0);

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for Counter {
    fn from(value: i64) -> Self {
        Counter(value)
    }
}

impl From<i32> for Counter {
    fn from(value: i32) -> Self {
        Counter(value.into())
    }
}

impl<'de> Deserialize<'de> for Counter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CounterVisitor;

        impl Visitor<'_> for CounterVisitor {
            type Value = Counter;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integral counter value")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Counter, E> {
                Ok(Counter(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Counter, E> {
                i64::try_from(v)
                    .map(Counter)
                    .map_err(|_| E::custom(format!("counter value {} is out of range", v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Counter, E> {
                // i64::MAX as f64 rounds up to 2^63, which is itself out of range
                if !v.is_finite() || v.fract() != 0.0 || v < i64::MIN as f64 || v >= i64::MAX as f64
                {
                    return Err(E::custom(format!(
                        "counter value {} is not an integral number",
                        v
                    )));
                }
                Ok(Counter(v as i64))
            }
        }

        deserializer.deserialize_any(CounterVisitor)
    }
}

/// Counters of one stat group, keyed by server-defined counter names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterMap(BTreeMap<String, Counter>);

impl CounterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Counter> {
        self.0.get(key).copied()
    }

    pub fn insert<K: Into<String>, V: Into<Counter>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Counter)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sums the counters whose key satisfies `keep`, saturating at the `i64` bounds.
    pub fn sum_where<F>(&self, mut keep: F) -> i64
    where
        F: FnMut(&str) -> bool,
    {
        self.0
            .iter()
            .filter(|(key, _)| keep(key))
            .fold(0i64, |acc, (_, value)| acc.saturating_add(value.0))
    }
}

impl<K: Into<String>, V: Into<Counter>> FromIterator<(K, V)> for CounterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Stats of one player: every [`StatGroup`] mapped to its counters.
///
/// No group is ever missing. Decoding scaffolds the full set first, then
/// overlays the groups present in the input; unknown group names are skipped
/// without looking at their content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsDocument {
    groups: BTreeMap<StatGroup, CounterMap>,
}

impl StatsDocument {
    /// Every group present and empty.
    pub fn scaffold() -> Self {
        Self {
            groups: StatGroup::ALL
                .into_iter()
                .map(|group| (group, CounterMap::new()))
                .collect(),
        }
    }

    pub fn group(&self, group: StatGroup) -> &CounterMap {
        // scaffolded on construction and never removed
        &self.groups[&group]
    }

    pub fn group_mut(&mut self, group: StatGroup) -> &mut CounterMap {
        self.groups.entry(group).or_default()
    }

    /// Replaces a group's counters.
    pub fn overlay(&mut self, group: StatGroup, counters: CounterMap) {
        self.groups.insert(group, counters);
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatGroup, &CounterMap)> {
        self.groups.iter().map(|(g, c)| (*g, c))
    }
}

impl Default for StatsDocument {
    fn default() -> Self {
        Self::scaffold()
    }
}

impl Serialize for StatsDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (group, counters) in &self.groups {
            map.serialize_entry(group.as_str(), counters)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatsDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatsVisitor;

        impl<'de> Visitor<'de> for StatsVisitor {
            type Value = StatsDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of stat groups to counters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StatsDocument, A::Error> {
                let mut document = StatsDocument::scaffold();

                while let Some(name) = access.next_key::<String>()? {
                    match StatGroup::from_name(&name) {
                        Some(group) => {
                            let counters = access.next_value::<Option<CounterMap>>()?;
                            document.overlay(group, counters.unwrap_or_default());
                        }
                        None => {
                            access.next_value::<IgnoredAny>()?;
                        }
                    }
                }

                Ok(document)
            }

            fn visit_unit<E: de::Error>(self) -> Result<StatsDocument, E> {
                Ok(StatsDocument::scaffold())
            }
        }

        deserializer.deserialize_any(StatsVisitor)
    }
}
