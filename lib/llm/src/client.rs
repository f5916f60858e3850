//! HTTP client for OpenAI-compatible endpoints

use crate::config::ClientConfig;
use crate::{Error, Result};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shared client handle.
///
/// Built once at startup and passed to every caller. Every request races
/// the cancellation token, so triggering it aborts in-flight work.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: ClientConfig,
    http: reqwest::Client,
    cancel: CancellationToken,
}

impl OpenAiClient {
    /// Validate `config` and build the client. No request is made.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            config,
            http,
            cancel: CancellationToken::new(),
        })
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run `fut`, failing with [`Error::Cancelled`] if the token fires first
    pub(crate) async fn guard<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            result = fut => result,
        }
    }

    /// POST a JSON body and return the successful response.
    ///
    /// `timeout` bounds the whole exchange; streaming callers pass `None`
    /// and bound each fragment instead.
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        let url = self.config.endpoint(path);
        debug!("POST {}", url);

        let mut request = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        // Bounds the wait for headers even when no per-request timeout is set
        let limit = self.config.timeout;
        let response = self
            .guard(async {
                tokio::time::timeout(limit, request.send())
                    .await
                    .map_err(|_| Error::Timeout(limit))?
                    .map_err(|e| self.transport(e))
            })
            .await?;
        self.guard(self.check_status(response)).await
    }

    /// POST a JSON body and decode the JSON reply
    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self.post(path, body, Some(self.config.timeout)).await?;
        let bytes = self
            .guard(async { response.bytes().await.map_err(|e| self.transport(e)) })
            .await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::Provider(format!("malformed response body: {}", e)))
    }

    pub(crate) fn transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.config.timeout)
        } else {
            Error::Transport(err)
        }
    }

    async fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = tokio::time::timeout(self.config.timeout, response.text())
            .await
            .ok()
            .and_then(|text| text.ok())
            .unwrap_or_default();
        Err(Error::Provider(status_message(status, &body)))
    }
}

/// `HTTP 401: <error.message>`, falling back to the raw body
fn status_message(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if message.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {}", status.as_u16(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_fails_before_any_request() {
        let err = OpenAiClient::new(ClientConfig::new("")).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_status_message_uses_api_error() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(
            status_message(StatusCode::UNAUTHORIZED, body),
            "HTTP 401: Incorrect API key provided"
        );
        assert_eq!(
            status_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "HTTP 502: upstream down"
        );
        assert_eq!(status_message(StatusCode::INTERNAL_SERVER_ERROR, ""), "HTTP 500");
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts_request() {
        let token = CancellationToken::new();
        token.cancel();
        let client = OpenAiClient::new(ClientConfig::new("sk-test").with_base_url("http://127.0.0.1:9"))
            .unwrap()
            .with_cancellation(token);

        let err = client
            .post("chat/completions", &serde_json::json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body("<html>gateway page</html>")
            .create_async()
            .await;

        let client = OpenAiClient::new(ClientConfig::new("sk-test").with_base_url(server.url())).unwrap();
        let err = client
            .post_json::<_, Value>("embeddings", &serde_json::json!({ "input": ["a"] }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(m) if m.starts_with("malformed response body")));
    }

    #[tokio::test]
    async fn test_stalled_server_times_out_without_request_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = ClientConfig::new("sk-test")
            .with_base_url(format!("http://{}", addr))
            .with_timeout(Duration::from_millis(300));
        let client = OpenAiClient::new(config).unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client.post("chat/completions", &serde_json::json!({}), None),
        )
        .await
        .expect("request must not hang");
        assert!(matches!(result, Err(Error::Timeout(_))));
    }

    #[tokio::test]
    async fn test_non_success_status_is_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer sk-test")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
            .create_async()
            .await;

        let client = OpenAiClient::new(ClientConfig::new("sk-test").with_base_url(server.url())).unwrap();
        let err = client
            .post_json::<_, Value>("embeddings", &serde_json::json!({ "input": [] }))
            .await
            .unwrap_err();

        match err {
            Error::Provider(message) => assert_eq!(message, "HTTP 429: Rate limit reached"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
