use std::time::Duration;

use thiserror::Error;

use crate::state::Workflow;

/// Failure to complete an HTTP exchange with the backend.
///
/// Variants only describe what went wrong; callers treat every variant the
/// same way.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("backend unreachable: {0}")]
    Network(String),
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::MalformedBody(err.to_string())
        } else if err.is_builder() {
            TransportError::Client(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// A well-formed response that does not carry what the workflow needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("no image returned from server")]
    NoImageReturned,
    #[error("response is missing the `{field}` field")]
    MissingField { field: &'static str },
    #[error("`{field}` field is not a string")]
    NotText { field: &'static str },
    #[error("image payload is not valid base64: {0}")]
    InvalidImage(String),
}

/// Client-side validation failure. Never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserInputError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Everything that can end a pending request without a result.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("request cancelled")]
    Cancelled,
}

/// Why a submission was not started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a request is already in flight")]
    Busy,
    #[error("{got:?} request sent to the {expected:?} view")]
    WrongWorkflow { expected: Workflow, got: Workflow },
    #[error(transparent)]
    Invalid(#[from] UserInputError),
}
