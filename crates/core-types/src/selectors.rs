//! Selector strategies and the element context they belong to

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of locator a [`SelectorStrategy`] describes.
///
/// Declaration order mirrors the stability assumption: identifiers first,
/// structural fallbacks and raw coordinates last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorType {
    Id,
    Name,
    DataAttr,
    TestId,
    TextExact,
    TextFuzzy,
    AriaLabel,
    RoleText,
    Placeholder,
    Title,
    AltText,
    Css,
    Xpath,
    Coordinates,
}

impl SelectorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorType::Id => "id",
            SelectorType::Name => "name",
            SelectorType::DataAttr => "data_attr",
            SelectorType::TestId => "test_id",
            SelectorType::TextExact => "text_exact",
            SelectorType::TextFuzzy => "text_fuzzy",
            SelectorType::AriaLabel => "aria_label",
            SelectorType::RoleText => "role_text",
            SelectorType::Placeholder => "placeholder",
            SelectorType::Title => "title",
            SelectorType::AltText => "alt_text",
            SelectorType::Css => "css",
            SelectorType::Xpath => "xpath",
            SelectorType::Coordinates => "coordinates",
        }
    }
}

impl fmt::Display for SelectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate way of re-finding an element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectorStrategy {
    #[serde(rename = "type")]
    pub kind: SelectorType,
    pub value: String,
    /// Lower values are tried first.
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl SelectorStrategy {
    pub fn new(kind: SelectorType, value: impl Into<String>, priority: u32) -> Self {
        Self {
            kind,
            value: value.into(),
            priority,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// String metadata entry, ignoring blanks.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// `type:value` form used in logs and step results.
    pub fn describe(&self) -> String {
        format!("{}:{}", self.kind, self.value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Last-resort location of an element.
///
/// Normalized values use a 0-1000 scale so a recording can be replayed in a
/// viewport of a different size.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl CoordinateInfo {
    pub fn absolute(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn has_absolute(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    pub fn has_normalized(&self) -> bool {
        self.normalized_x.is_some() && self.normalized_y.is_some()
    }
}

/// Everything recorded about the element an action targets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementContext {
    pub target_text: String,
    #[serde(default)]
    pub selector_strategies: Vec<SelectorStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<CoordinateInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_attributes: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
}

impl ElementContext {
    pub fn new(target_text: impl Into<String>) -> Self {
        Self {
            target_text: target_text.into(),
            ..Self::default()
        }
    }

    pub fn with_strategies(mut self, strategies: Vec<SelectorStrategy>) -> Self {
        self.selector_strategies = strategies;
        self
    }

    pub fn with_coordinates(mut self, coordinates: CoordinateInfo) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Strategy with the lowest priority value.
    pub fn primary_selector(&self) -> Option<&SelectorStrategy> {
        self.selector_strategies.iter().min_by_key(|s| s.priority)
    }

    pub fn css_selector(&self) -> Option<&str> {
        self.first_of(SelectorType::Css)
    }

    pub fn xpath_selector(&self) -> Option<&str> {
        self.first_of(SelectorType::Xpath)
    }

    pub fn has_selectors(&self) -> bool {
        !self.selector_strategies.is_empty()
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates
            .as_ref()
            .map(|c| c.has_absolute() || c.has_normalized())
            .unwrap_or(false)
    }

    /// A context without strategies and without usable coordinates can never resolve.
    pub fn is_resolvable(&self) -> bool {
        self.has_selectors() || self.has_coordinates()
    }

    /// Strategies in the order they should be attempted.
    pub fn ordered_strategies(&self) -> Vec<&SelectorStrategy> {
        let mut ordered: Vec<&SelectorStrategy> = self.selector_strategies.iter().collect();
        ordered.sort_by_key(|s| s.priority);
        ordered
    }

    fn first_of(&self, kind: SelectorType) -> Option<&str> {
        self.selector_strategies
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.value.as_str())
    }
}
