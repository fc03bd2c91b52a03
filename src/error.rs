use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    #[error("remote service unavailable: {reason}")]
    RemoteUnavailable { reason: String },

    #[error("authentication missing or rejected")]
    AuthRequired,

    #[error("unknown template: {template_id}")]
    UnknownTemplate { template_id: String },

    #[error("pagination not exhausted: fetched {fetched} of {reported} reported rows")]
    IncompletePagination { fetched: usize, reported: u64 },

    #[error("server rejected template payload: {reason}")]
    ValidationRejected { reason: String },

    #[error("a template named \"{name}\" already exists")]
    DuplicateName { name: String },

    #[error("unexpected response status: {status}")]
    UnexpectedStatus { status: StatusCode },
}

impl ClientError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Self::RemoteUnavailable {
            reason: err.to_string(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }
}
