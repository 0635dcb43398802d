//! Observation input for recording sessions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use waymark_core_types::ElementSnapshot;

use crate::errors::RecorderError;

/// Kind of action observed, before its parameters are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Navigation,
    Click,
    Input,
    SelectChange,
    KeyPress,
    Scroll,
    GoBack,
    GoForward,
    Extract,
    Wait,
}

impl ActionType {
    pub const ALL: [ActionType; 10] = [
        ActionType::Navigation,
        ActionType::Click,
        ActionType::Input,
        ActionType::SelectChange,
        ActionType::KeyPress,
        ActionType::Scroll,
        ActionType::GoBack,
        ActionType::GoForward,
        ActionType::Extract,
        ActionType::Wait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Navigation => "navigation",
            ActionType::Click => "click",
            ActionType::Input => "input",
            ActionType::SelectChange => "select_change",
            ActionType::KeyPress => "key_press",
            ActionType::Scroll => "scroll",
            ActionType::GoBack => "go_back",
            ActionType::GoForward => "go_forward",
            ActionType::Extract => "extract",
            ActionType::Wait => "wait",
        }
    }

    /// Actions that cannot be recorded without an element context.
    pub fn requires_element(&self) -> bool {
        matches!(
            self,
            ActionType::Click | ActionType::Input | ActionType::SelectChange
        )
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = RecorderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| RecorderError::UnknownActionType(s.to_string()))
    }
}

/// Everything known about one action at the moment it happened.
#[derive(Debug, Clone)]
pub struct Observation {
    pub action_type: ActionType,
    /// Element under the action point, read from the live page
    pub snapshot: Option<ElementSnapshot>,
    /// Absolute viewport coordinates of the action
    pub point: Option<(i32, i32)>,
    pub parameters: Map<String, Value>,
    pub reasoning: Option<String>,
    pub screenshot: Option<Vec<u8>>,
}

impl Observation {
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            snapshot: None,
            point: None,
            parameters: Map::new(),
            reasoning: None,
            screenshot: None,
        }
    }

    pub fn with_snapshot(mut self, snapshot: ElementSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.point = Some((x, y));
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn with_screenshot(mut self, bytes: Vec<u8>) -> Self {
        self.screenshot = Some(bytes);
        self
    }
}
