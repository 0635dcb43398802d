//! Action union recorded per workflow step

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::selectors::ElementContext;

fn default_true() -> bool {
    true
}

/// Kind-specific payload of an action, discriminated by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    Navigation {
        url: String,
    },
    Click {
        element: ElementContext,
    },
    Input {
        element: ElementContext,
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
        #[serde(default = "default_true")]
        clear_before: bool,
        #[serde(default)]
        press_enter: bool,
    },
    SelectChange {
        element: ElementContext,
        selected_text: String,
    },
    KeyPress {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element: Option<ElementContext>,
        key: String,
    },
    Scroll {
        #[serde(default)]
        scroll_x: i32,
        scroll_y: i32,
    },
    GoBack,
    GoForward,
    Extract {
        extraction_goal: String,
    },
    Wait {
        /// Seconds.
        duration: f64,
    },
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Navigation { .. } => "navigation",
            ActionKind::Click { .. } => "click",
            ActionKind::Input { .. } => "input",
            ActionKind::SelectChange { .. } => "select_change",
            ActionKind::KeyPress { .. } => "key_press",
            ActionKind::Scroll { .. } => "scroll",
            ActionKind::GoBack => "go_back",
            ActionKind::GoForward => "go_forward",
            ActionKind::Extract { .. } => "extract",
            ActionKind::Wait { .. } => "wait",
        }
    }

    /// Element this action targets, if any.
    pub fn element(&self) -> Option<&ElementContext> {
        match self {
            ActionKind::Click { element }
            | ActionKind::Input { element, .. }
            | ActionKind::SelectChange { element, .. } => Some(element),
            ActionKind::KeyPress { element, .. } => element.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A recorded action: the kind-specific payload plus fields shared by all kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(flatten)]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Key under which the step output is stored in the run's extracted data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Seconds to pause after the action completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_checks: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_outcome: Option<String>,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            description: None,
            output: None,
            wait_time: None,
            verification_checks: None,
            expected_outcome: None,
        }
    }

    pub fn navigation(url: impl Into<String>) -> Self {
        Self::new(ActionKind::Navigation { url: url.into() })
    }

    pub fn click(element: ElementContext) -> Self {
        Self::new(ActionKind::Click { element })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_wait_time(mut self, seconds: f64) -> Self {
        self.wait_time = Some(seconds);
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl From<ActionKind> for Action {
    fn from(kind: ActionKind) -> Self {
        Action::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::{SelectorStrategy, SelectorType};

    #[test]
    fn shared_fields_sit_next_to_the_tag() {
        let action = Action::navigation("https://example.com")
            .with_description("open home")
            .with_wait_time(1.5);
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], "navigation");
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["description"], "open home");
        assert_eq!(value["wait_time"], 1.5);
        assert!(value.get("output").is_none());
    }

    #[test]
    fn input_defaults_apply_on_load() {
        let json = r#"{
            "type": "input",
            "element": {"target_text": "Search"},
            "value": "rust"
        }"#;
        let action: Action = serde_json::from_str(json).unwrap();
        match action.kind {
            ActionKind::Input {
                clear_before,
                press_enter,
                default_value,
                ..
            } => {
                assert!(clear_before);
                assert!(!press_enter);
                assert!(default_value.is_none());
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn unit_variants_and_unknown_fields() {
        let action: Action =
            serde_json::from_str(r#"{"type": "go_back", "confidence": 0.4}"#).unwrap();
        assert_eq!(action.kind, ActionKind::GoBack);

        let scroll: Action = serde_yaml::from_str("type: scroll\nscroll_y: 400\n").unwrap();
        assert_eq!(
            scroll.kind,
            ActionKind::Scroll {
                scroll_x: 0,
                scroll_y: 400
            }
        );
    }

    #[test]
    fn element_accessor_covers_targeting_kinds() {
        let element = ElementContext::new("Go")
            .with_strategies(vec![SelectorStrategy::new(SelectorType::Id, "go", 1)]);
        assert!(Action::click(element.clone()).kind.element().is_some());
        let key = ActionKind::KeyPress {
            element: None,
            key: "Enter".into(),
        };
        assert!(key.element().is_none());
        assert_eq!(key.name(), "key_press");
        assert!(ActionKind::Wait { duration: 1.0 }.element().is_none());
    }
}
