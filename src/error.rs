use crate::{ApiError, config};

/// Any error returned by a [`Client`](crate::Client) operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration could not be turned into a valid request.
    #[error("Invalid configuration")]
    Configuration(#[from] config::Error),
    /// The service could not be reached, or the connection failed while
    /// reading the response.
    #[error("Failed to reach the API")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    /// The service answered with a non-200 status.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The service answered with 200, but the body was not what we expected.
    #[error("Invalid response body ({status})")]
    Decode {
        /// The HTTP status of the response.
        status: http::StatusCode,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Wrap a transport-level failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Transport(Box::new(err))
    }

    /// The HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Error::Api(e) => Some(e.status()),
            Error::Decode { status, .. } => Some(*status),
            Error::Configuration(_) | Error::Transport(_) => None,
        }
    }
}
