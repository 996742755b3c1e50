use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

/// The input name under which fan-out passes the message batch.
pub const MESSAGES_INPUT: &str = "messages";

/// How a process run treats any user-facing step it contains.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FrontendBehavior {
    /// Skip user-facing steps; the run is fire-and-forget.
    #[default]
    Skip,

    /// Surface user-facing steps to an interactive frontend.
    Interactive,
}

/// Executes a named process with named input values.
///
/// This is the external execution engine invoked for process-style
/// subscribers; fan-out treats the run as fire-and-forget.
#[async_trait]
pub trait ProcessRunner: Debug + Send + Sync + 'static {
    /// Runs the named process with the given input values.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be started or failed.
    async fn run_process(
        &self,
        name: &str,
        inputs: HashMap<String, Value>,
        frontend: FrontendBehavior,
    ) -> anyhow::Result<()>;
}
