use std::sync::Arc;

use async_trait::async_trait;
use medchat_core::{BackendError, ChatBackend};

/// Answers every question with the same text
pub struct StaticBackend(pub String);

#[async_trait]
impl ChatBackend for StaticBackend {
    async fn ask(&self, _question: &str) -> Result<String, BackendError> {
        Ok(self.0.clone())
    }

    async fn health(&self) -> Result<String, BackendError> {
        Ok("ok".to_string())
    }
}

/// Never answers, so submissions stay pending
pub struct StalledBackend;

#[async_trait]
impl ChatBackend for StalledBackend {
    async fn ask(&self, _question: &str) -> Result<String, BackendError> {
        std::future::pending().await
    }

    async fn health(&self) -> Result<String, BackendError> {
        std::future::pending().await
    }
}

/// Fails every question as if the server were down
pub struct FailingBackend;

#[async_trait]
impl ChatBackend for FailingBackend {
    async fn ask(&self, _question: &str) -> Result<String, BackendError> {
        Err(BackendError::Connect("connection refused".to_string()))
    }

    async fn health(&self) -> Result<String, BackendError> {
        Err(BackendError::Connect("connection refused".to_string()))
    }
}

pub fn answering(answer: &str) -> Arc<dyn ChatBackend> {
    Arc::new(StaticBackend(answer.to_string()))
}

pub fn stalled() -> Arc<dyn ChatBackend> {
    Arc::new(StalledBackend)
}

pub fn failing() -> Arc<dyn ChatBackend> {
    Arc::new(FailingBackend)
}
