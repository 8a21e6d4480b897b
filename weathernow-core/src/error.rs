//! Error taxonomy for a single city lookup.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Blank input. Callers treat this as a no-op rather than a failure.
    #[error("Enter a city name to search")]
    EmptyQuery,

    #[error("City not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Weather service error: {0}")]
    Upstream(String),

    #[error("Incomplete forecast data: {0}")]
    MalformedPayload(String),

    #[error("A search is already in progress")]
    Busy,

    #[error("Search was cancelled")]
    Cancelled,
}

impl QueryError {
    /// Message shown to the user in place of the forecast.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "City not found".to_string(),
            other => other.to_string(),
        }
    }

    /// Errors the rendering layer should swallow without showing anything.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::EmptyQuery)
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network("request timed out".to_string())
        } else if err.is_decode() {
            Self::Upstream(format!("unexpected response: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}
