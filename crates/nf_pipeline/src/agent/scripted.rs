use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use nf_core::{Error, Result};

use super::AgentClient;

enum Script {
    Reply(String),
    Fail(String),
}

/// Agent double with canned behavior. Used by tests and by dry runs where
/// no credentials are configured.
pub struct ScriptedAgent {
    script: Mutex<Vec<Script>>,
    calls: AtomicUsize,
}

impl ScriptedAgent {
    /// Replies with `response` on every call.
    pub fn replying(response: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(vec![Script::Reply(response.into())]),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call, as if the remote service were unreachable.
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(vec![Script::Fail("scripted outage".to_string())]),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replies with each response in turn, repeating the last one.
    pub fn replying_in_turn(responses: Vec<String>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().map(Script::Reply).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentClient for ScriptedAgent {
    async fn invoke(&self, _prompt: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().unwrap_or_else(|e| e.into_inner());
        let step = script.get(call).or_else(|| script.last());
        match step {
            Some(Script::Reply(response)) => Ok(response.clone()),
            Some(Script::Fail(reason)) => Err(Error::Agent(reason.clone())),
            None => Err(Error::Agent("empty script".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replying_counts_calls() {
        let agent = ScriptedAgent::replying("ok");
        assert_eq!(agent.invoke("a").await.unwrap(), "ok");
        assert_eq!(agent.invoke("b").await.unwrap(), "ok");
        assert_eq!(agent.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failing() {
        let agent = ScriptedAgent::failing();
        assert!(agent.invoke("a").await.is_err());
    }

    #[tokio::test]
    async fn test_replying_in_turn_repeats_last() {
        let agent =
            ScriptedAgent::replying_in_turn(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(agent.invoke("").await.unwrap(), "one");
        assert_eq!(agent.invoke("").await.unwrap(), "two");
        assert_eq!(agent.invoke("").await.unwrap(), "two");
    }
}
