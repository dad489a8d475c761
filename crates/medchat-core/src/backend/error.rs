use thiserror::Error;

/// The only failure text a user ever sees, whatever actually went wrong.
pub const FAILURE_TEXT: &str = "Error: Could not connect to the server.";

/// Why a backend call failed. The variants only feed the logs; the chat
/// view collapses all of them into [`FAILURE_TEXT`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("could not connect to backend: {0}")]
    Connect(String),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("request task died: {0}")]
    TaskFailed(String),
}

impl BackendError {
    pub fn user_message(&self) -> &'static str {
        FAILURE_TEXT
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout(err.to_string())
        } else if err.is_connect() {
            BackendError::Connect(err.to_string())
        } else if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}
