//! Action Primitives - browser driving capability
//!
//! This crate defines the boundary between replay logic and a live browser:
//! - `BrowserDriver`: navigate, coordinate input, element queries, element input
//! - `ElementQuery`: one query shape per selector family
//! - Visibility waiting with bounded polling
//! - `ActionError` taxonomy shared by every driver implementation
//!
//! With the `scripted` feature a deterministic in-memory page is available
//! for tests that must not launch a browser.

pub mod errors;
mod primitives;
pub mod types;
mod waiting;

#[cfg(any(test, feature = "scripted"))]
pub mod scripted;

pub use errors::*;
pub use primitives::*;
pub use types::*;
pub use waiting::*;
