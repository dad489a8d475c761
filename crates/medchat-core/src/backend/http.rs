use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BackendError, ChatBackend};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/chat";

#[derive(Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    answer: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
}

/// JSON-over-HTTP chat backend. No timeout and no retries: a request runs
/// until reqwest gives up on it.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: Url,
}

/// Check that `endpoint` is an absolute http(s) URL
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| anyhow!("Invalid chat endpoint '{}': {}", endpoint, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "Chat endpoint must be an http(s) URL, got '{}'",
            url
        ));
    }

    Ok(url)
}

impl HttpBackend {
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            endpoint: parse_endpoint(endpoint)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn health_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path("/");
        url.set_query(None);
        url
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn ask(&self, question: &str) -> Result<String, BackendError> {
        debug!(endpoint = %self.endpoint, question, "posting question");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ChatRequest { question })
            .send()
            .await?;

        let response = check_status(response).await?;
        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response.answer)
    }

    async fn health(&self) -> Result<String, BackendError> {
        let url = self.health_url();
        debug!(%url, "checking backend health");

        let response = self.client.get(url).send().await?;
        let response = check_status(response).await?;
        let status_response: StatusResponse = response.json().await?;
        Ok(status_response.status)
    }
}
