//! Statboard Server
//!
//! HTTP front end for the Statboard leaderboard engine.
//!
//! # Example
//!
//! ```ignore
//! use statboard_server::{Authorizer, Handler, run_server};
//!
//! let handler = Handler::new(db, Authorizer::new(mutation_key)?);
//! run_server(listener, handler, shutdown).await?;
//! ```

pub mod auth;
pub mod handler;
pub mod transport;

pub use auth::{AuthError, Authorizer};
pub use handler::Handler;

pub use transport::http::{router, run_server, status_for};
