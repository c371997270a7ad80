//! Transport layer for Statboard server
//!
//! Available transports:
//! - `http` - axum HTTP service on a single path

pub mod http;
