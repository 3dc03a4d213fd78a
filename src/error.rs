// Error handling module
// Defines the client-side error taxonomy for API calls

use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while talking to the CMS API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API answered with a failure envelope or an error status.
    /// `details` carries field-level validation errors for form display.
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        details: Option<HashMap<String, Vec<String>>>,
    },

    /// Terminal 401: the request was already retried after a refresh,
    /// or the server rejected the credentials outright.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The refresh call itself failed. The stored token has been
    /// cleared and the session-expired hook has already run.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Network-level failure, no usable response was received
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered 2xx but the body was not a valid envelope
    #[error("Decode error: {0}")]
    Decode(String),

    /// Internal client error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Validation errors are failure envelopes that carry field details
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Api { details: Some(_), .. })
    }

    /// Field-level validation details, if the server provided any
    pub fn validation_details(&self) -> Option<&HashMap<String, Vec<String>>> {
        match self {
            ApiError::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
