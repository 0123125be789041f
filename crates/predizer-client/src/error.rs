use serde::Serialize;
use thiserror::Error;

use crate::utils::const_settings::BODY_SNIPPET_MAX;

/// Errors that can occur during a prediction request.
///
/// Only [`PredictError::Request`] is meant to reach the user; the remaining variants describe a
/// server that broke the response contract and are surfaced through logs.
#[derive(Debug, Clone, Error, Serialize)]
pub enum PredictError {
    /// The request could not complete: connection refused, DNS failure, timeout.
    ///
    /// Displays as the underlying transport description only, so it can be embedded in the
    /// rendered error line.
    #[error("{message}")]
    Request {
        message: String,
        /// Optional URL for additional context.
        url: Option<String>,
        is_timeout: bool,
    },

    /// Failed to serialize the request payload.
    #[error("Failed to serialize request data: {0}")]
    Serialization(String),

    /// The response body is not JSON.
    #[error("Failed to deserialize response data (status {status}): {message}")]
    Deserialization {
        status: u16,
        message: String,
        /// Truncated snippet of the offending body.
        body_snippet: Option<String>,
    },

    /// The response body lacks the field expected for its status.
    #[error("Response (status {status}) is missing field `{field}`")]
    MissingField {
        status: u16,
        field: &'static str,
        body_snippet: Option<String>,
    },
}

impl PredictError {
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        PredictError::Request {
            message: err.to_string(),
            url: err.url().map(|u| u.to_string()),
            is_timeout: err.is_timeout(),
        }
    }

    /// Whether the failure is a transport failure the form renders as an error line.
    pub fn is_transport(&self) -> bool {
        matches!(self, PredictError::Request { .. })
    }

    /// HTTP status of the offending response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            PredictError::Deserialization { status, .. }
            | PredictError::MissingField { status, .. } => Some(*status),
            PredictError::Request { .. } | PredictError::Serialization(_) => None,
        }
    }

    /// Returns a diagnostic string with contextual fields for log surfaces.
    pub fn diagnostic(&self) -> String {
        match self {
            PredictError::Request {
                message,
                url,
                is_timeout,
            } => {
                let mut msg = format!("Network request failed: {message}");
                if let Some(u) = url {
                    msg.push_str(&format!("\nurl: {u}"));
                }
                if *is_timeout {
                    msg.push_str("\ncontext: timed out");
                }
                msg
            }
            PredictError::Deserialization {
                body_snippet: Some(snippet),
                ..
            }
            | PredictError::MissingField {
                body_snippet: Some(snippet),
                ..
            } => format!("{self}\nbody excerpt: {snippet}"),
            other => other.to_string(),
        }
    }
}

/// Truncate large response bodies so error strings remain bounded.
pub(crate) fn body_snippet(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    if body.len() <= BODY_SNIPPET_MAX {
        return Some(body.to_string());
    }
    let mut end = BODY_SNIPPET_MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    Some(format!("{}…<snip>", &body[..end]))
}

/// Workspace classification of a failed prediction.
///
/// The form renders transport failures itself, so the `Request` arm only serves library callers
/// that use [`crate::HttpPredictor`] without the form and route every failure through an
/// `ErrorPolicy`.
impl From<PredictError> for predizer_error::Error {
    fn from(error: PredictError) -> Self {
        match error {
            PredictError::Request { message, .. } => {
                predizer_error::Error::Domain(predizer_error::DomainError::Http { message })
            }
            PredictError::Serialization(message) => predizer_error::Error::Warning(
                predizer_error::WarningError::RequestEncoding(message),
            ),
            err @ (PredictError::Deserialization { .. } | PredictError::MissingField { .. }) => {
                predizer_error::Error::Warning(predizer_error::WarningError::UnhandledResponse {
                    status: err.status(),
                    message: err.diagnostic(),
                })
            }
        }
    }
}
