pub mod error;
pub mod http;

use async_trait::async_trait;

pub use error::{BackendError, FAILURE_TEXT};
pub use http::{parse_endpoint, HttpBackend, DEFAULT_ENDPOINT};

/// Something that can answer a question. The exchange controller only
/// talks to this trait so tests can swap the HTTP client out.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, BackendError>;

    /// Liveness probe, returns the backend's self-reported status
    async fn health(&self) -> Result<String, BackendError>;
}
