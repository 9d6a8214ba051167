//! HTTP client for the registration API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::http::response::{ErrorBody, RegisterResponse};

/// Per-request timeout for heartbeat and unregister calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for registration calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid server URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Rejected { status: StatusCode, message: String },
}

/// Talks to one registration server on behalf of one identifier.
#[derive(Debug, Clone)]
pub struct RegistrationClient {
    client: Client,
    server: Url,
    id: String,
}

impl RegistrationClient {
    pub fn new(server: &str, id: &str) -> Result<Self, ClientError> {
        let server = Url::parse(server).map_err(|source| ClientError::InvalidUrl {
            url: server.to_string(),
            source,
        })?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            server,
            id: id.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.server.join(path).map_err(|source| ClientError::InvalidUrl {
            url: format!("{}{}", self.server, path),
            source,
        })
    }

    /// Register this identifier for `port`; returns the public URL.
    pub async fn register(&self, port: u16) -> Result<String, ClientError> {
        let resp = self
            .client
            .post(self.endpoint("register")?)
            .json(&serde_json::json!({ "id": self.id, "port": port }))
            .send()
            .await?;

        let resp = check(resp).await?;
        let body: RegisterResponse = resp.json().await?;
        Ok(body.url)
    }

    pub async fn heartbeat(&self) -> Result<(), ClientError> {
        self.post_with_id("heartbeat").await
    }

    pub async fn unregister(&self) -> Result<(), ClientError> {
        self.post_with_id("unregister").await
    }

    async fn post_with_id(&self, path: &str) -> Result<(), ClientError> {
        let resp = self
            .client
            .post(self.endpoint(path)?)
            .query(&[("id", self.id.as_str())])
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);
    Err(ClientError::Rejected { status, message })
}
