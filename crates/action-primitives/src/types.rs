//! Core data types for browser primitives

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page query understood by every [`crate::BrowserDriver`].
///
/// Each query resolves to the first matching element in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementQuery {
    /// Element whose `id` equals the value
    Id { id: String },
    /// Raw CSS selector
    Css { selector: String },
    /// Raw XPath expression
    XPath { expression: String },
    /// Element whose attribute equals the value
    Attribute { name: String, value: String },
    /// Visible text; exact compares the whole normalized text, otherwise a
    /// case-insensitive substring match. Optionally scoped to a tag.
    Text {
        value: String,
        exact: bool,
        tag: Option<String>,
    },
    /// Semantic role plus accessible name
    Role { role: String, name: String },
    /// Accessible label (`aria-label` or an associated `<label>`)
    Label { label: String },
    Placeholder { value: String },
    Title { value: String },
    AltText { value: String },
    /// `data-testid` style attribute
    TestId { value: String },
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementQuery::Id { id } => write!(f, "#{}", id),
            ElementQuery::Css { selector } => write!(f, "css={}", selector),
            ElementQuery::XPath { expression } => write!(f, "xpath={}", expression),
            ElementQuery::Attribute { name, value } => write!(f, "[{}=\"{}\"]", name, value),
            ElementQuery::Text { value, exact, tag } => write!(
                f,
                "text{}={:?}{}",
                if *exact { "" } else { "~" },
                value,
                tag.as_deref().map(|t| format!(" in <{}>", t)).unwrap_or_default()
            ),
            ElementQuery::Role { role, name } => write!(f, "role={}[name={:?}]", role, name),
            ElementQuery::Label { label } => write!(f, "label={:?}", label),
            ElementQuery::Placeholder { value } => write!(f, "placeholder={:?}", value),
            ElementQuery::Title { value } => write!(f, "title={:?}", value),
            ElementQuery::AltText { value } => write!(f, "alt={:?}", value),
            ElementQuery::TestId { value } => write!(f, "testid={:?}", value),
        }
    }
}

/// Live element located by a driver.
///
/// The selector is driver specific: the Chromium driver tags the element with
/// a unique attribute and stores the matching CSS selector here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    pub selector: String,
}

impl ElementHandle {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector)
    }
}

/// Current viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1366,
            height: 768,
        }
    }
}
