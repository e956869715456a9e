//! HTTP transport over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use vtt_core::{Session, SessionId};
use vtt_session::{Action, CreateSession};

use crate::error::{ClientError, ClientResult};
use crate::transport::SessionTransport;

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: String,
    #[serde(default)]
    message: String,
}

/// Reaches a `vtt-server` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the server at `base_url` (e.g.
    /// `http://127.0.0.1:8787`). Every request is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// The server's base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn session_url(&self, id: &SessionId) -> String {
        format!("{}/session/{id}", self.base_url)
    }
}

/// Decode a success body, or turn an error body into [`ClientError::Rejected`].
async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let text = response.text().await?;
    let (code, message) = match serde_json::from_str::<ErrorReply>(&text) {
        Ok(reply) => (reply.error, reply.message),
        Err(_) => (
            status.canonical_reason().unwrap_or("Error").to_string(),
            text,
        ),
    };
    Err(ClientError::Rejected {
        status: status.as_u16(),
        code,
        message,
    })
}

#[async_trait]
impl SessionTransport for HttpTransport {
    async fn read_session(&self, id: &SessionId) -> ClientResult<Session> {
        let response = self.client.get(self.session_url(id)).send().await?;
        decode(response).await
    }

    async fn submit(&self, id: &SessionId, action: &Action) -> ClientResult<Session> {
        let response = self
            .client
            .post(self.session_url(id))
            .json(action)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_session(&self, id: &SessionId, requester_id: &str) -> ClientResult<()> {
        let response = self
            .client
            .delete(self.session_url(id))
            .query(&[("requesterId", requester_id)])
            .send()
            .await?;
        let _: serde_json::Value = decode(response).await?;
        Ok(())
    }

    async fn create_session(&self, request: &CreateSession) -> ClientResult<Session> {
        let response = self
            .client
            .post(format!("{}/session", self.base_url))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }
}
