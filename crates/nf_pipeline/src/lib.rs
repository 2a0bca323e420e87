pub mod agent;
pub mod parse;
pub mod pipeline;
pub mod prompt;

pub use agent::{AgentClient, RemoteAgent, ScriptedAgent};
pub use parse::{parse_batch_response, BatchEntry, BatchOutcome};
pub use pipeline::Pipeline;
