//! Core types for locator system

use std::fmt;

use action_primitives::ElementHandle;

/// Description used when the coordinate fallback produced the target.
pub const COORDINATES_STRATEGY: &str = "coordinates";

/// What the finder resolved a context to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTarget {
    /// Live element found by a selector strategy
    Element(ElementHandle),
    /// Absolute viewport position from the coordinate fallback
    Coordinates { x: i32, y: i32 },
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedTarget::Element(handle) => write!(f, "element {}", handle),
            ResolvedTarget::Coordinates { x, y } => write!(f, "({}, {})", x, y),
        }
    }
}

/// Successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub target: ResolvedTarget,
    /// `type:value` of the winning strategy, or `coordinates`
    pub used_strategy: String,
    /// Failures of strategies tried before the winning one
    pub strategy_errors: Vec<String>,
}

impl Resolution {
    pub fn element(handle: ElementHandle, used_strategy: impl Into<String>) -> Self {
        Self {
            target: ResolvedTarget::Element(handle),
            used_strategy: used_strategy.into(),
            strategy_errors: Vec::new(),
        }
    }

    pub fn coordinates(x: i32, y: i32) -> Self {
        Self {
            target: ResolvedTarget::Coordinates { x, y },
            used_strategy: COORDINATES_STRATEGY.to_string(),
            strategy_errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.strategy_errors = errors;
        self
    }

    pub fn is_coordinate_fallback(&self) -> bool {
        matches!(self.target, ResolvedTarget::Coordinates { .. })
    }

    /// Absolute point when the coordinate fallback produced the target.
    pub fn point(&self) -> Option<(i32, i32)> {
        match self.target {
            ResolvedTarget::Coordinates { x, y } => Some((x, y)),
            ResolvedTarget::Element(_) => None,
        }
    }

    pub fn handle(&self) -> Option<&ElementHandle> {
        match &self.target {
            ResolvedTarget::Element(handle) => Some(handle),
            ResolvedTarget::Coordinates { .. } => None,
        }
    }
}
