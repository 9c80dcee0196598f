//! Error type for the fallible setup paths (mounting, config, storage).
//!
//! The running game loop never returns these: storage and surface failures
//! inside a session are logged and swallowed.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum ArcadeError {
    #[error("unknown game variant `{0}`")]
    UnknownVariant(String),

    #[error("invalid arcade config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid tuning for `{variant}`: {reason}")]
    Tuning { variant: String, reason: &'static str },

    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: &'static str },

    #[error("no game selected")]
    NothingSelected,

    #[error("browser environment is missing {0}")]
    MissingDom(&'static str),

    #[error("local storage is unavailable")]
    StorageUnavailable,

    #[error("storage rejected write for `{key}`")]
    StorageWrite { key: String },

    #[error("stored high score for `{key}` is not a number: {value:?}")]
    CorruptScore { key: String, value: String },
}

impl From<ArcadeError> for JsValue {
    fn from(err: ArcadeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
