use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::selectors::BoundingBox;

/// One-time DOM read of an element at the point of interaction.
///
/// Attributes keep document order; the first matching `data-*` attribute
/// wins during selector synthesis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl ElementSnapshot {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Raw attribute value, empty strings included.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value only when present and non-empty.
    pub fn non_empty_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name).filter(|value| !value.is_empty())
    }

    /// First `data-*` attribute carrying a value.
    pub fn first_data_attribute(&self) -> Option<(&str, &str)> {
        self.attributes
            .iter()
            .find(|(key, value)| key.starts_with("data-") && !value.is_empty())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn normalized_tag(&self) -> String {
        self.tag.trim().to_lowercase()
    }

    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    pub fn attributes_map(&self) -> BTreeMap<String, String> {
        self.attributes.iter().cloned().collect()
    }

    /// Semantic role: an explicit `role` attribute wins (a blank one means no
    /// role), otherwise the implicit role of the tag.
    pub fn inferred_role(&self) -> Option<String> {
        if let Some(explicit) = self.attribute("role") {
            let explicit = explicit.trim();
            return (!explicit.is_empty()).then(|| explicit.to_string());
        }
        implicit_role(&self.normalized_tag(), self.attribute("type")).map(str::to_string)
    }
}

/// Implicit ARIA role of a tag; `input` types checkbox, radio and submit override the tag.
pub fn implicit_role(tag: &str, input_type: Option<&str>) -> Option<&'static str> {
    if tag == "input" {
        match input_type.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("checkbox") => return Some("checkbox"),
            Some("radio") => return Some("radio"),
            Some("submit") => return Some("button"),
            _ => {}
        }
    }
    let role = match tag {
        "button" => "button",
        "a" => "link",
        "input" | "textarea" => "textbox",
        "select" => "combobox",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "img" => "img",
        "table" => "table",
        "ul" | "ol" => "list",
        "nav" => "navigation",
        _ => return None,
    };
    Some(role)
}
