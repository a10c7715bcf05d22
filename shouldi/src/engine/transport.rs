//! HTTP transport for the chat-completion call. Abstraction for testing.

use async_trait::async_trait;

/// Raw HTTP reply: status code and body text, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request could not be sent or its body could not be read.
#[derive(Debug, thiserror::Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Sends one JSON POST with bearer auth.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpReply, TransportError>;
}

/// Reqwest-based transport. Uses the client's default timeouts.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpReply, TransportError> {
        let res = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = res.status().as_u16();
        let body = res.text().await.map_err(|e| TransportError(e.to_string()))?;
        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        let reply = |status| HttpReply {
            status,
            body: String::new(),
        };
        assert!(reply(200).is_success());
        assert!(reply(204).is_success());
        assert!(!reply(301).is_success());
        assert!(!reply(429).is_success());
    }
}
