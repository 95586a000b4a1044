use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("unknown vendor: {0}")]
    UnknownVendor(String),
    #[error("invalid OUI prefix {0:?} (expected three hex octets, e.g. 00:11:22)")]
    InvalidPrefix(String),
    #[error("command failed: {0}")]
    CommandFailure(String),
    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("interface not found: {0}")]
    InterfaceNotFound(String),
    #[error("neither `ip` nor `ifconfig` found on PATH")]
    MissingTool,
}

impl From<serde_json::Error> for IdentityError {
    fn from(err: serde_json::Error) -> Self {
        IdentityError::IoFailure(err.into())
    }
}
