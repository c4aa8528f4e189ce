use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use super::traits::InferenceBackend;
use super::types::{GenerateRequest, GenerateResponse};
use crate::app::OllamaConfig;
use crate::constants::OLLAMA_GENERATE_PATH;
use crate::utils::PiError;

/// HTTP client for a local Ollama server
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    probe_timeout: Duration,
}

impl OllamaClient {
    /// Create a client from the `[ollama]` configuration section
    pub fn new(config: &OllamaConfig) -> Result<Self, PiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
        })
    }

    fn generate_url(&self) -> String {
        format!("{}{}", self.base_url, OLLAMA_GENERATE_PATH)
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn probe(&self) -> Result<(), PiError> {
        debug!("Probing Ollama at {}", self.base_url);

        // Dropping the future on expiry cancels the in-flight request
        match timeout(self.probe_timeout, self.client.get(&self.base_url).send()).await {
            Ok(Ok(resp)) => {
                debug!("Ollama answered probe with {}", resp.status());
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(PiError::TimeoutError(self.probe_timeout.as_millis() as u64)),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>, PiError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!("POST {} (model {})", self.generate_url(), self.model);
        let resp = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        debug!("Ollama replied {} ({} bytes)", status, body.len());

        if !status.is_success() {
            let detail = serde_json::from_str::<GenerateResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(body);
            return Err(PiError::ApiError(format!("Ollama returned {}: {}", status, detail)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| PiError::ApiError(format!("malformed response body: {}", e)))?;

        Ok(parsed.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::net::TcpListener;

    fn config_for(base_url: &str) -> OllamaConfig {
        OllamaConfig {
            base_url: base_url.to_string(),
            probe_timeout_ms: 300,
            request_timeout_secs: 5,
            ..OllamaConfig::default()
        }
    }

    /// An address nothing is listening on
    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}", port)
    }

    #[tokio::test]
    async fn test_probe_connected() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("Ollama is running")
            .create_async()
            .await;

        let client = OllamaClient::new(&config_for(&server.url())).unwrap();
        assert!(client.probe().await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe_accepts_any_status() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/").with_status(503).create_async().await;

        let client = OllamaClient::new(&config_for(&server.url())).unwrap();
        assert!(client.probe().await.is_ok());
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        let client = OllamaClient::new(&config_for(&closed_port_url())).unwrap();
        let err = client.probe().await.unwrap_err();
        assert!(matches!(err, PiError::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_probe_times_out() {
        // Accepts connections via the backlog but never answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let client = OllamaClient::new(&config_for(&url)).unwrap();
        let started = std::time::Instant::now();
        let err = client.probe().await.unwrap_err();

        assert!(matches!(err, PiError::TimeoutError(300)));
        assert!(started.elapsed() < Duration::from_secs(3));
        drop(listener);
    }

    #[tokio::test]
    async fn test_generate_sends_non_streaming_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "model": "qwen2.5:1.5b",
                "prompt": "You are Pi-Swarm Security Agent. User asks: hello",
                "stream": false
            })))
            .with_status(200)
            .with_body(r#"{"model":"qwen2.5:1.5b","response":"Hi, how can I help?","done":true}"#)
            .create_async()
            .await;

        let client = OllamaClient::new(&config_for(&server.url())).unwrap();
        let text = client
            .generate("You are Pi-Swarm Security Agent. User asks: hello")
            .await
            .unwrap();

        assert_eq!(text.as_deref(), Some("Hi, how can I help?"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_trailing_slash_in_base_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .with_body(r#"{"response":"ok"}"#)
            .create_async()
            .await;

        let client = OllamaClient::new(&config_for(&format!("{}/", server.url()))).unwrap();
        assert_eq!(client.generate("x").await.unwrap().as_deref(), Some("ok"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_empty_response_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_body(r#"{"response":"","done":true}"#)
            .create_async()
            .await;

        let client = OllamaClient::new(&config_for(&server.url())).unwrap();
        assert_eq!(client.generate("x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_generate_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_body("<html>proxy error</html>")
            .create_async()
            .await;

        let client = OllamaClient::new(&config_for(&server.url())).unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, PiError::ApiError(_)));
        assert!(err.to_string().contains("malformed response body"));
    }

    #[tokio::test]
    async fn test_generate_error_status_surfaces_ollama_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(404)
            .with_body(r#"{"error":"model \"qwen2.5:1.5b\" not found, try pulling it first"}"#)
            .create_async()
            .await;

        let client = OllamaClient::new(&config_for(&server.url())).unwrap();
        let err = client.generate("x").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("try pulling it first"));
    }

    #[tokio::test]
    async fn test_generate_unreachable() {
        let client = OllamaClient::new(&config_for(&closed_port_url())).unwrap();
        assert!(matches!(
            client.generate("x").await.unwrap_err(),
            PiError::NetworkError(_)
        ));
    }
}
