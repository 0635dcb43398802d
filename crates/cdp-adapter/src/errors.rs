use action_primitives::ActionError;
use chromiumoxide::error::CdpError;
use thiserror::Error;

/// Failures while starting or stopping the browser.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("no Chrome/Chromium executable found; set WAYMARK_CHROME or browser.executable")]
    ExecutableNotFound,

    #[error("browser config error: {0}")]
    Config(String),

    #[error("failed to launch chromium: {0}")]
    Launch(String),

    #[error("CDP error: {0}")]
    Cdp(#[from] CdpError),
}

pub(crate) fn cdp_io(err: CdpError) -> ActionError {
    match err {
        CdpError::Timeout => ActionError::WaitTimeout("CDP request timed out".to_string()),
        CdpError::JavascriptException(exception) => ActionError::Script(exception.text.clone()),
        other => ActionError::CdpIo(other.to_string()),
    }
}

pub(crate) fn decode(err: serde_json::Error) -> ActionError {
    ActionError::Script(format!("unexpected script result: {err}"))
}
