//! Selector strategy synthesis
//!
//! Strategies are emitted in a fixed order, most stable first:
//! 1. `id`
//! 2. `data_attr` (first non-empty `data-*` attribute)
//! 3. `name`
//! 4. `test_id` (`data-testid`, `data-test-id`, `data-test`)
//! 5. `text_exact`
//! 6. `aria_label`
//! 7. `role_text`
//! 8. `placeholder`, `title`, `alt_text`
//! 9. `text_fuzzy` (text longer than 3 characters)
//! 10. `css` structural fallback
//! 11. `xpath` structural fallback
//!
//! Priorities come from a running counter, so they are strictly increasing
//! in emission order.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use waymark_core_types::{ElementSnapshot, SelectorStrategy, SelectorType};

/// Similarity threshold recorded on fuzzy text strategies.
pub const FUZZY_TEXT_THRESHOLD: f64 = 0.8;

const TEST_ID_ATTRIBUTES: [&str; 3] = ["data-testid", "data-test-id", "data-test"];

/// Builds selector strategies from an element snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SelectorGenerator {
    pub include_xpath_fallback: bool,
    pub include_css_fallback: bool,
}

impl Default for SelectorGenerator {
    fn default() -> Self {
        Self {
            include_xpath_fallback: true,
            include_css_fallback: true,
        }
    }
}

struct Emitter {
    tag: String,
    next_priority: u32,
    strategies: Vec<SelectorStrategy>,
}

impl Emitter {
    fn emit(&mut self, kind: SelectorType, value: &str, extra: &[(&str, Value)]) {
        let mut strategy = SelectorStrategy::new(kind, value, self.next_priority);
        for (key, val) in extra {
            strategy = strategy.with_metadata(*key, val.clone());
        }
        if !self.tag.is_empty() {
            strategy = strategy.with_metadata("tag", self.tag.clone());
        }
        self.next_priority += 1;
        self.strategies.push(strategy);
    }
}

impl SelectorGenerator {
    pub fn new(include_xpath_fallback: bool, include_css_fallback: bool) -> Self {
        Self {
            include_xpath_fallback,
            include_css_fallback,
        }
    }

    /// Ordered strategies for `snapshot`, sorted by ascending priority.
    pub fn generate(&self, snapshot: &ElementSnapshot) -> Vec<SelectorStrategy> {
        let mut out = Emitter {
            tag: snapshot.normalized_tag(),
            next_priority: 1,
            strategies: Vec::new(),
        };
        let text = snapshot.trimmed_text();

        if let Some(id) = snapshot.non_empty_attribute("id") {
            out.emit(SelectorType::Id, id, &[]);
        }

        if let Some((attribute, value)) = snapshot.first_data_attribute() {
            out.emit(
                SelectorType::DataAttr,
                value,
                &[("attribute", Value::from(attribute))],
            );
        }

        if let Some(name) = snapshot.non_empty_attribute("name") {
            out.emit(SelectorType::Name, name, &[]);
        }

        if let Some((attribute, value)) = TEST_ID_ATTRIBUTES
            .iter()
            .find_map(|attr| snapshot.non_empty_attribute(attr).map(|v| (*attr, v)))
        {
            out.emit(
                SelectorType::TestId,
                value,
                &[("attribute", Value::from(attribute))],
            );
        }

        if !text.is_empty() {
            out.emit(SelectorType::TextExact, text, &[]);
        }

        if let Some(label) = snapshot.non_empty_attribute("aria-label") {
            out.emit(SelectorType::AriaLabel, label, &[]);
        }

        if let Some(role) = snapshot.inferred_role() {
            if !text.is_empty() {
                out.emit(SelectorType::RoleText, text, &[("role", Value::from(role))]);
            }
        }

        for (attribute, kind) in [
            ("placeholder", SelectorType::Placeholder),
            ("title", SelectorType::Title),
            ("alt", SelectorType::AltText),
        ] {
            if let Some(value) = snapshot.non_empty_attribute(attribute) {
                out.emit(kind, value, &[]);
            }
        }

        if text.chars().count() > 3 {
            out.emit(
                SelectorType::TextFuzzy,
                text,
                &[("threshold", Value::from(FUZZY_TEXT_THRESHOLD))],
            );
        }

        if self.include_css_fallback {
            if let Some(css) = css_selector(snapshot) {
                out.emit(SelectorType::Css, &css, &[("fallback", Value::Bool(true))]);
            }
        }

        if self.include_xpath_fallback {
            if let Some(xpath) = xpath_selector(snapshot) {
                out.emit(SelectorType::Xpath, &xpath, &[("fallback", Value::Bool(true))]);
            }
        }

        let mut strategies = out.strategies;
        strategies.sort_by_key(|s| s.priority);
        debug!(
            tag = %snapshot.normalized_tag(),
            count = strategies.len(),
            "Generated selector strategies"
        );
        strategies
    }
}

/// Escape `:` and `.` so an id can follow `#` in a CSS selector.
pub fn escape_css_id(id: &str) -> String {
    id.replace(':', "\\:").replace('.', "\\.")
}

/// Escape a value for a double-quoted CSS attribute selector.
pub fn escape_css_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('"', "\\\"")
}

/// Structural CSS selector; `None` when only a bare tag would result.
pub fn css_selector(snapshot: &ElementSnapshot) -> Option<String> {
    let tag = snapshot.normalized_tag();
    if let Some(id) = snapshot.non_empty_attribute("id") {
        return Some(format!("{}#{}", tag, escape_css_id(id)));
    }
    if let Some(name) = snapshot.non_empty_attribute("name") {
        return Some(format!("{}[name=\"{}\"]", tag, escape_css_value(name)));
    }
    if let Some((attribute, value)) = snapshot.first_data_attribute() {
        return Some(format!("{}[{}=\"{}\"]", tag, attribute, escape_css_value(value)));
    }
    for attribute in ["aria-label", "placeholder"] {
        if let Some(value) = snapshot.non_empty_attribute(attribute) {
            return Some(format!("{}[{}=\"{}\"]", tag, attribute, escape_css_value(value)));
        }
    }
    None
}

/// XPath string literal for `value`.
///
/// Single quotes are preferred; a value containing `'` is wrapped in double
/// quotes, and a value containing both quote kinds is rebuilt with `concat`.
pub fn xpath_literal(value: &str) -> String {
    match (value.contains('\''), value.contains('"')) {
        (false, _) => format!("'{}'", value),
        (true, false) => format!("\"{}\"", value),
        (true, true) => {
            let parts: Vec<String> = value.split('\'').map(|part| format!("'{}'", part)).collect();
            format!("concat({})", parts.join(", \"'\", "))
        }
    }
}

/// Structural XPath; `None` when no condition applies.
pub fn xpath_selector(snapshot: &ElementSnapshot) -> Option<String> {
    let tag = snapshot.normalized_tag();
    let tag = if tag.is_empty() { "*".to_string() } else { tag };

    let condition = if let Some(id) = snapshot.non_empty_attribute("id") {
        format!("@id={}", xpath_literal(id))
    } else if let Some(name) = snapshot.non_empty_attribute("name") {
        format!("@name={}", xpath_literal(name))
    } else if let Some((attribute, value)) = snapshot.first_data_attribute() {
        format!("@{}={}", attribute, xpath_literal(value))
    } else if let Some(label) = snapshot.non_empty_attribute("aria-label") {
        format!("@aria-label={}", xpath_literal(label))
    } else if let Some(placeholder) = snapshot.non_empty_attribute("placeholder") {
        format!("@placeholder={}", xpath_literal(placeholder))
    } else if !snapshot.trimmed_text().is_empty() {
        format!("contains(text(), {})", xpath_literal(snapshot.trimmed_text()))
    } else {
        return None;
    };

    Some(format!("//{}[{}]", tag, condition))
}

/// Overview of a generated strategy list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub primary: Option<SelectorStrategy>,
    pub has_css_fallback: bool,
    pub has_xpath_fallback: bool,
}

pub fn summarize(strategies: &[SelectorStrategy]) -> StrategySummary {
    let mut by_type = BTreeMap::new();
    for strategy in strategies {
        *by_type.entry(strategy.kind.to_string()).or_insert(0) += 1;
    }
    StrategySummary {
        total: strategies.len(),
        by_type,
        primary: strategies.iter().min_by_key(|s| s.priority).cloned(),
        has_css_fallback: strategies.iter().any(|s| s.kind == SelectorType::Css),
        has_xpath_fallback: strategies.iter().any(|s| s.kind == SelectorType::Xpath),
    }
}
