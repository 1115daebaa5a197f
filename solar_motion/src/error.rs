// Typed errors with thiserror. Converted to JsValue only at the wasm boundary.
// Autoplay rejection is not a SiteError: the audio controller absorbs it as a state change.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Site error types.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Required element missing: {0}")]
    MissingElement(String),

    #[error("Browser API unavailable: {0}")]
    BrowserApi(&'static str),

    #[error("JavaScript error: {0}")]
    Js(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        SiteError::Serialization(err.to_string())
    }
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Js(describe_js(&value))
    }
}

impl From<SiteError> for JsValue {
    fn from(err: SiteError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// A media `play()` promise rejected, typically by the autoplay policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("playback rejected: {0}")]
pub struct PlaybackRejected(pub String);

pub(crate) fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
