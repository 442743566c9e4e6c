use reqwest::StatusCode;
use shared::{domain::GuestId, error::ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("guest api transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("guest api upstream error {status}{}", upstream_suffix(.message))]
    Upstream {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("guest api response decode error: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("invalid guest api url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("guest {0} not found")]
    NotFound(GuestId),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Upstream { status, .. } if *status == StatusCode::NOT_FOUND => {
                ErrorKind::NotFound
            }
            ClientError::Upstream { status, .. }
                if *status == StatusCode::BAD_REQUEST
                    || *status == StatusCode::UNPROCESSABLE_ENTITY =>
            {
                ErrorKind::Validation
            }
            ClientError::Upstream { .. } => ErrorKind::Upstream,
            ClientError::Decode(_) => ErrorKind::Decode,
            ClientError::InvalidUrl { .. } => ErrorKind::Internal,
            ClientError::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

fn upstream_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
