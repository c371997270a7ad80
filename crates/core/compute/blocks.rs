//! Classification of counter keys as placeable blocks.

use crate::error::Result;
use rustc_hash::FxHashSet;
use std::path::Path;

/// Decides whether a `used` counter key names a placeable block.
pub trait BlockClassifier: Send + Sync {
    fn is_block(&self, key: &str) -> bool;
}

/// Accepts every key. Used when no block list is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyKey;

impl BlockClassifier for AnyKey {
    fn is_block(&self, _key: &str) -> bool {
        true
    }
}

impl<F> BlockClassifier for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_block(&self, key: &str) -> bool {
        self(key)
    }
}

/// Explicit set of block identifiers.
///
/// Bare ids (`stone`) are stored in their `minecraft:` namespaced form.
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    blocks: FxHashSet<String>,
}

impl BlockList {
    pub fn new<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            blocks: blocks
                .into_iter()
                .filter_map(|b| Self::normalize(b.as_ref()))
                .collect(),
        }
    }

    /// One id per line; blank lines and `#` comments are skipped.
    pub fn parse(input: &str) -> Self {
        Self::new(input.lines().map(|line| match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        }))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let list = Self::parse(&contents);
        log::debug!(
            "Loaded {} block ids from {}",
            list.len(),
            path.as_ref().display()
        );
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn normalize(raw: &str) -> Option<String> {
        let id = raw.trim();
        if id.is_empty() {
            None
        } else if id.contains(':') {
            Some(id.to_string())
        } else {
            Some(format!("minecraft:{}", id))
        }
    }
}

impl BlockClassifier for BlockList {
    fn is_block(&self, key: &str) -> bool {
        self.blocks.contains(key)
    }
}
