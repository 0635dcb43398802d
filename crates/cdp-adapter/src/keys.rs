//! Raw key strokes sent through `Input.dispatchKeyEvent`

use action_primitives::ActionError;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};

/// CDP modifier bits.
const MOD_CTRL: i64 = 2;
const MOD_META: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: &'static str,
    pub code: &'static str,
    pub key_code: i64,
    pub modifiers: i64,
    /// Editing commands run with the key down, e.g. `selectAll`.
    pub commands: &'static [&'static str],
}

impl KeyStroke {
    /// Key-down then key-up for this stroke.
    pub fn events(&self) -> Result<[DispatchKeyEventParams; 2], ActionError> {
        Ok([
            self.event(DispatchKeyEventType::KeyDown, true)?,
            self.event(DispatchKeyEventType::KeyUp, false)?,
        ])
    }

    fn event(
        &self,
        kind: DispatchKeyEventType,
        with_commands: bool,
    ) -> Result<DispatchKeyEventParams, ActionError> {
        let mut builder = DispatchKeyEventParams::builder()
            .r#type(kind)
            .key(self.key)
            .code(self.code)
            .windows_virtual_key_code(self.key_code)
            .native_virtual_key_code(self.key_code)
            .modifiers(self.modifiers);
        if with_commands && !self.commands.is_empty() {
            builder = builder.commands(
                self.commands
                    .iter()
                    .map(|command| command.to_string())
                    .collect::<Vec<String>>(),
            );
        }
        builder.build().map_err(ActionError::Internal)
    }
}

fn select_all_modifier() -> i64 {
    if cfg!(target_os = "macos") {
        MOD_META
    } else {
        MOD_CTRL
    }
}

/// Select-all followed by Backspace. Works on whatever has focus and never
/// fails on non-editable targets.
pub fn clear_focused() -> [KeyStroke; 2] {
    [
        KeyStroke {
            key: "a",
            code: "KeyA",
            key_code: 65,
            modifiers: select_all_modifier(),
            commands: &["selectAll"],
        },
        KeyStroke {
            key: "Backspace",
            code: "Backspace",
            key_code: 8,
            modifiers: 0,
            commands: &[],
        },
    ]
}
