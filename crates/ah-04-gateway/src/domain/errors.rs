//! Gateway errors.

use thiserror::Error;

/// Errors that can occur when calling the remote gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid gateway endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot connect to {0}")]
    Connection(String),

    #[error("gateway answered {status}: {body}")]
    Status { status: u16, body: String },
}
