use async_trait::async_trait;
use nf_core::Result;

pub mod remote;
pub mod scripted;

pub use remote::RemoteAgent;
pub use scripted::ScriptedAgent;

/// The opaque remote natural-language service. One call is one
/// request/response exchange; the response is free text with no structure
/// guaranteed beyond what the prompt asked for.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String>;
}
