use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid action id '{0}': must be a non-empty dot-delimited token")]
    InvalidActionId(String),

    #[error("action '{0}' is in the resolver fallback namespace and cannot be enabled")]
    PolicyConflict(String),

    #[error("{0} is not set")]
    BackendNotSet(String),

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
