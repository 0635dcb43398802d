//! Locator - selector strategy synthesis and element resolution
//!
//! Recording side: [`SelectorGenerator`] turns a one-time element snapshot
//! into a priority-ordered list of selector strategies, most stable first
//! (id, data attributes, name, test ids, text, accessibility attributes),
//! ending with structural CSS and XPath fallbacks.
//!
//! Replay side: [`ElementFinder`] tries those strategies in priority order
//! against the live page, requires each candidate to become visible within a
//! bounded wait, and falls back to recorded coordinates as the last resort.

pub mod coordinates;
pub mod errors;
pub mod generator;
pub mod resolver;
pub mod strategies;
pub mod types;

pub use coordinates::*;
pub use errors::*;
pub use generator::*;
pub use resolver::*;
pub use strategies::*;
pub use types::*;
