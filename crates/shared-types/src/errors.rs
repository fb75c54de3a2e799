//! Error types shared by the tooltip engine and its hosts
//! Provides consistent error handling and reporting

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base error type for all tooltip attachment operations
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum TooltipError {
    // Configuration errors
    #[error("Invalid dataset: {message}")]
    InvalidDataset { message: String },

    #[error("Missing required accessor: {field}")]
    MissingAccessor { field: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
        field: Option<String>,
    },

    // Surface errors
    #[error("No chart surface could be resolved from the given root")]
    SurfaceNotFound,

    #[error("Scale mode requested but no x/y scales were found on the wrapper or surface")]
    ScalesUnavailable,

    #[error("No marker elements matched {selector:?} (fallback {fallback:?})")]
    NoMarkers { selector: String, fallback: String },

    // Host errors
    #[error("Tooltip overlay error: {message}")]
    Overlay { message: String },

    #[error("JavaScript interop error: {message}")]
    JsInterop { message: String },
}

/// Result type alias for tooltip operations
pub type TooltipResult<T> = Result<T, TooltipError>;

impl TooltipError {
    pub fn invalid_config(field: &str, message: impl Into<String>) -> Self {
        TooltipError::InvalidConfig {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    pub fn missing_accessor(field: &str) -> Self {
        TooltipError::MissingAccessor {
            field: field.to_string(),
        }
    }

    /// Serialize to the `{type, details}` JSON shape for JavaScript callers
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"JsInterop","details":{"message":"Failed to serialize error"}}"#.to_string()
        })
    }
}

#[cfg(feature = "wasm")]
impl From<wasm_bindgen::JsValue> for TooltipError {
    fn from(err: wasm_bindgen::JsValue) -> Self {
        use wasm_bindgen::JsCast;

        let message = match err.dyn_ref::<js_sys::Error>() {
            Some(error) => String::from(error.message()),
            None => err.as_string().unwrap_or_else(|| format!("{err:?}")),
        };
        TooltipError::JsInterop { message }
    }
}

#[cfg(feature = "wasm")]
impl From<TooltipError> for wasm_bindgen::JsValue {
    fn from(err: TooltipError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
