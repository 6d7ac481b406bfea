use thiserror::Error;

/// Errors produced by the gateway layer.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Connection, TLS or timeout failure before a response arrived.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered outside the 2xx range.
    #[error("Server responded with status {status}")]
    Status { status: reqwest::StatusCode },

    /// The body did not match the documented response shape. The gateway
    /// decodes exactly one canonical shape per operation and never probes
    /// alternatives.
    #[error("Malformed response body: {0}")]
    Decode(String),

    /// The configured base URL could not be used to build a client.
    #[error("Invalid gateway configuration: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;
