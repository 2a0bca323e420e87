use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use nf_core::config::AgentConfig;
use nf_core::{Error, Result};
use serde::{Deserialize, Serialize};

use super::AgentClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct ChatRequest<'a> {
    agent_id: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    content: String,
}

/// HTTP client for the hosted agent service, authenticated with the
/// credential triple supplied at construction.
pub struct RemoteAgent {
    client: reqwest::Client,
    endpoint: String,
    agent_id: String,
    auth_key: String,
    auth_secret: String,
}

impl fmt::Debug for RemoteAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteAgent")
            .field("endpoint", &self.endpoint)
            .field("agent_id", &self.agent_id)
            .field("auth_key", &"<redacted>")
            .field("auth_secret", &"<redacted>")
            .finish()
    }
}

impl RemoteAgent {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        if config.agent_id.is_empty() || config.auth_key.is_empty() || config.auth_secret.is_empty()
        {
            return Err(Error::Config(
                "agent credentials (agent_id, auth_key, auth_secret) are required".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            agent_id: config.agent_id.clone(),
            auth_key: config.auth_key.clone(),
            auth_secret: config.auth_secret.clone(),
        })
    }
}

#[async_trait]
impl AgentClient for RemoteAgent {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            agent_id: &self.agent_id,
            prompt,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Auth-Key", &self.auth_key)
            .header("X-Auth-Secret", &self.auth_secret)
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Agent(e.to_string()))?
            .json::<ChatResponse>()
            .await
            .map_err(|e| Error::Agent(format!("malformed agent response: {}", e)))?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> AgentConfig {
        AgentConfig {
            endpoint: endpoint.to_string(),
            agent_id: "agent-1".to_string(),
            auth_key: "key".to_string(),
            auth_secret: "secret".to_string(),
        }
    }

    #[test]
    fn test_requires_credentials() {
        let mut cfg = config("https://example.com");
        cfg.auth_key.clear();
        assert!(RemoteAgent::new(&cfg).is_err());
        assert!(RemoteAgent::new(&config("https://example.com")).is_ok());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let agent = RemoteAgent::new(&config("https://example.com")).unwrap();
        let rendered = format!("{:?}", agent);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_invoke_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .match_header("X-Auth-Key", "key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": "[{\"id\":1}]"}"#)
            .create_async()
            .await;

        let agent = RemoteAgent::new(&config(&format!("{}/chat", server.url()))).unwrap();
        let reply = agent.invoke("hello").await.unwrap();
        assert_eq!(reply, "[{\"id\":1}]");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invoke_maps_http_failure_to_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat")
            .with_status(503)
            .create_async()
            .await;

        let agent = RemoteAgent::new(&config(&format!("{}/chat", server.url()))).unwrap();
        assert!(agent.invoke("hello").await.is_err());
    }
}
