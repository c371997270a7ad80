//! Stat normalization, totals derivation, query building and validation.

pub mod aggregate;
pub mod blocks;
pub mod query;
pub mod validation;
