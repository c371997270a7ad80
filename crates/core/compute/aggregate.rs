//! Normalization of raw player stats and derivation of the totals group.

use super::blocks::BlockClassifier;
use statboard_types::player::{Advancement, AdvancementInput};
use statboard_types::stats::{CounterMap, StatGroup, StatsDocument};

/// Counter keys read from the `custom` group.
pub const DEATHS_COUNTER: &str = "minecraft:deaths";
pub const PLAY_TIME_COUNTER: &str = "minecraft:play_time";

/// Game ticks per second; `minecraft:play_time` is counted in ticks.
pub const TICKS_PER_SECOND: i64 = 20;

/// Keys of the derived `totals` group.
pub mod totals {
    pub const DEATHS: &str = "deaths";
    pub const PLAY_TIME: &str = "play_time";
    pub const BLOCKS_PLACED: &str = "blocks_placed";
    pub const BLOCKS_BROKEN: &str = "blocks_broken";
    pub const ADVANCEMENTS_DONE: &str = "advancements_done";
}

/// Canonical stats and advancements ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub stats: StatsDocument,
    pub advancements: Vec<Advancement>,
}

impl Normalized {
    pub fn advancements_done(&self) -> usize {
        self.advancements.len()
    }
}

/// Turns decoded client stats into the canonical document.
///
/// Every group is present in the output. Whatever the client sent for the
/// totals group is discarded and recomputed from the other groups. Only
/// advancements marked done are kept, in input order.
pub fn normalize(
    raw: StatsDocument,
    inputs: &[AdvancementInput],
    blocks: &dyn BlockClassifier,
) -> Normalized {
    let mut stats = StatsDocument::scaffold();
    for (group, counters) in raw.iter() {
        if group != StatGroup::Totals {
            stats.overlay(group, counters.clone());
        }
    }

    let advancements = completed_advancements(inputs);
    let derived = compute_totals(&stats, advancements.len(), blocks);
    stats.overlay(StatGroup::Totals, derived);

    Normalized {
        stats,
        advancements,
    }
}

/// Keeps the keys of completed advancements.
pub fn completed_advancements(inputs: &[AdvancementInput]) -> Vec<Advancement> {
    inputs
        .iter()
        .filter(|input| input.done)
        .map(|input| Advancement::new(input.key.clone()))
        .collect()
}

/// Derives the totals group from already-normalized groups.
pub fn compute_totals(
    stats: &StatsDocument,
    advancements_done: usize,
    blocks: &dyn BlockClassifier,
) -> CounterMap {
    let custom = stats.group(StatGroup::Custom);

    let deaths = custom.get(DEATHS_COUNTER).map_or(0, |c| c.get());
    let play_time = custom
        .get(PLAY_TIME_COUNTER)
        .map_or(0, |c| c.get() / TICKS_PER_SECOND);
    let blocks_placed = stats
        .group(StatGroup::Used)
        .sum_where(|key| blocks.is_block(key));
    let blocks_broken = stats.group(StatGroup::Mined).sum_where(|_| true);
    let advancements_done = i64::try_from(advancements_done).unwrap_or(i64::MAX);

    let mut group = CounterMap::new();
    group.insert(totals::DEATHS, deaths);
    group.insert(totals::PLAY_TIME, play_time);
    group.insert(totals::BLOCKS_PLACED, blocks_placed);
    group.insert(totals::BLOCKS_BROKEN, blocks_broken);
    group.insert(totals::ADVANCEMENTS_DONE, advancements_done);
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::blocks::{AnyKey, BlockList};
    use statboard_types::stats::Counter;

    fn counters(pairs: &[(&str, i64)]) -> CounterMap {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn total(n: &Normalized, key: &str) -> i64 {
        n.stats.group(StatGroup::Totals).get(key).unwrap().get()
    }

    #[test]
    fn test_missing_groups_default_to_zero() {
        let n = normalize(StatsDocument::scaffold(), &[], &AnyKey);

        for group in StatGroup::ALL {
            let _ = n.stats.group(group);
        }
        for key in [
            totals::DEATHS,
            totals::PLAY_TIME,
            totals::BLOCKS_PLACED,
            totals::BLOCKS_BROKEN,
            totals::ADVANCEMENTS_DONE,
        ] {
            assert_eq!(total(&n, key), 0, "{}", key);
        }
    }

    #[test]
    fn test_reference_write() {
        let mut raw = StatsDocument::scaffold();
        raw.overlay(
            StatGroup::Custom,
            counters(&[(DEATHS_COUNTER, 3), (PLAY_TIME_COUNTER, 200)]),
        );
        raw.overlay(StatGroup::Used, counters(&[("minecraft:dirt", 5)]));
        raw.overlay(StatGroup::Mined, counters(&[("minecraft:stone", 10)]));
        let inputs = [
            AdvancementInput::new("a1", true),
            AdvancementInput::new("a2", false),
        ];

        let n = normalize(raw, &inputs, &AnyKey);

        assert_eq!(total(&n, totals::DEATHS), 3);
        assert_eq!(total(&n, totals::PLAY_TIME), 10);
        assert_eq!(total(&n, totals::BLOCKS_PLACED), 5);
        assert_eq!(total(&n, totals::BLOCKS_BROKEN), 10);
        assert_eq!(total(&n, totals::ADVANCEMENTS_DONE), 1);
        assert_eq!(n.advancements, vec![Advancement::new("a1")]);
        assert_eq!(n.advancements_done(), 1);
    }

    #[test]
    fn test_play_time_truncates() {
        let mut raw = StatsDocument::scaffold();
        raw.overlay(StatGroup::Custom, counters(&[(PLAY_TIME_COUNTER, 39)]));
        let n = normalize(raw, &[], &AnyKey);
        assert_eq!(total(&n, totals::PLAY_TIME), 1);
    }

    #[test]
    fn test_blocks_broken_sums_all_keys() {
        let mut raw = StatsDocument::scaffold();
        raw.overlay(
            StatGroup::Mined,
            counters(&[("minecraft:stone", 7), ("weird key", 3), ("", 90)]),
        );
        let n = normalize(raw, &[], &BlockList::new(["stone"]));
        assert_eq!(total(&n, totals::BLOCKS_BROKEN), 100);
    }

    #[test]
    fn test_blocks_placed_uses_classifier() {
        let mut raw = StatsDocument::scaffold();
        raw.overlay(
            StatGroup::Used,
            counters(&[("minecraft:dirt", 5), ("minecraft:diamond_sword", 40)]),
        );
        let n = normalize(raw, &[], &BlockList::new(["dirt"]));
        assert_eq!(total(&n, totals::BLOCKS_PLACED), 5);
    }

    #[test]
    fn test_client_totals_are_discarded() {
        let mut raw = StatsDocument::scaffold();
        raw.overlay(
            StatGroup::Totals,
            counters(&[(totals::DEATHS, 999), ("injected", 1)]),
        );
        let n = normalize(raw, &[], &AnyKey);

        let totals_group = n.stats.group(StatGroup::Totals);
        assert_eq!(totals_group.get(totals::DEATHS), Some(Counter(0)));
        assert_eq!(totals_group.get("injected"), None);
        assert_eq!(totals_group.len(), 5);
    }

    #[test]
    fn test_advancements_done_counts_only_done() {
        let inputs: Vec<AdvancementInput> = (0..10)
            .map(|i| AdvancementInput::new(format!("adv{}", i), i % 3 == 0))
            .collect();
        let n = normalize(StatsDocument::scaffold(), &inputs, &AnyKey);

        assert_eq!(total(&n, totals::ADVANCEMENTS_DONE), 4);
        let keys: Vec<&str> = n.advancements.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["adv0", "adv3", "adv6", "adv9"]);
    }
}
