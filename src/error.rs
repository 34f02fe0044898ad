use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Stable machine-readable code used by robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidState(_) => "invalid_state",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}
