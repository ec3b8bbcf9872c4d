use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading/validation error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend collaborator error.
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// Streaming channel error.
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Session usage error.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Internal protocol type error.
    #[error("Proto error: {0}")]
    Proto(#[from] ProtoError),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem read error.
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(String),
}

/// Errors reported by the backend collaborator.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The collaborator does not provide this capability.
    #[error("Capability not supported: {0}")]
    Unsupported(&'static str),

    /// The backend rejected or failed the request.
    #[error("{0}")]
    Backend(String),

    /// Network/connection-level failure.
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Streaming channel errors
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Channel has been closed.
    #[error("Channel closed")]
    Closed,
}

/// Errors surfaced to callers of an established session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session exists yet, or the collaborator cannot send.
    #[error("Session not ready")]
    NotReady,

    /// The collaborator failed the delegated call.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Internal proto errors
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Invalid role string value.
    #[error("Invalid role: {0}")]
    InvalidRole(String),
}
