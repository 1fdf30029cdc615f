use thiserror::Error;

/// Library error type for preview operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The preview target could not be resolved to a surface.
    #[error("Invalid target element.")]
    InvalidTarget,

    /// No customization block was supplied for the media.
    #[error("Missing mediaCustomization")]
    MissingCustomization,

    /// The customization has nothing to mount as a cover.
    #[error("invalid mediaCustomization: {0}")]
    InvalidCustomization(String),

    /// Option values that serde defaults cannot rule out (fps of zero, ...).
    #[error("invalid preview options: {0}")]
    InvalidOptions(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}

/// Failure of the "fetch sprite index text" capability.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),
}
