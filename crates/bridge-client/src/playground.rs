use bridge_core::{ActionId, BridgeResult};
use serde::Serialize;
use serde_json::Value;

use crate::client::{BridgeClient, SendOptions};

pub const PLAYGROUND_ACTION: &str = "playground.generate";
pub const RUNS_PER_SESSION: u8 = 4;

const FALLBACK_MESSAGE: &str = "Backend unreachable. Try Gmail preview or retry.";

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub platform: String,
    pub tone: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    Generated,
    Failed,
    /// Counter at zero; nothing was sent.
    Exhausted,
    /// A round is already in flight; nothing was sent.
    Busy,
}

/// Playground control state. Calls the backend directly, without the
/// resolver or the policy gate.
#[derive(Debug, Clone)]
pub struct Playground {
    runs_left: u8,
    generating: bool,
    output: String,
}

impl Default for Playground {
    fn default() -> Self {
        Self {
            runs_left: RUNS_PER_SESSION,
            generating: false,
            output: String::new(),
        }
    }
}

impl Playground {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs_left(&self) -> u8 {
        self.runs_left
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn reset_runs(&mut self) {
        self.runs_left = RUNS_PER_SESSION;
    }

    /// Start a round: checks the counter, builds the request and marks the
    /// control busy. The caller sends the request and hands the result to
    /// [`Playground::finish`]; while it is in flight `is_generating()` is true.
    pub fn begin(&mut self, req: &GenerateRequest) -> Result<(ActionId, Value), GenerateOutcome> {
        if self.generating {
            return Err(GenerateOutcome::Busy);
        }
        if self.runs_left == 0 {
            return Err(GenerateOutcome::Exhausted);
        }
        match prepare(req) {
            Ok(call) => {
                self.generating = true;
                Ok(call)
            }
            Err(e) => {
                self.output = e.to_string();
                Err(GenerateOutcome::Failed)
            }
        }
    }

    /// Close a round started with [`Playground::begin`]. The counter only
    /// drops when the backend returns a string `data.output`.
    pub fn finish(&mut self, result: BridgeResult) -> GenerateOutcome {
        self.generating = false;

        let generated = result
            .data
            .as_ref()
            .filter(|_| result.ok)
            .and_then(|d| d.get("output"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());

        match generated {
            Some(text) => {
                self.output = text.to_string();
                self.runs_left = self.runs_left.saturating_sub(1);
                GenerateOutcome::Generated
            }
            None => {
                self.output = result
                    .error
                    .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
                tracing::debug!(output = %self.output, "playground generation failed");
                GenerateOutcome::Failed
            }
        }
    }

    /// One full round. Dropping the future mid-call leaves the control idle
    /// with the counter untouched.
    pub async fn generate(&mut self, client: &BridgeClient, req: &GenerateRequest) -> GenerateOutcome {
        let (action, payload) = match self.begin(req) {
            Ok(call) => call,
            Err(outcome) => return outcome,
        };

        let result = {
            let _busy = BusyGuard(&mut self.generating);
            client
                .send(&action, SendOptions::new().payload(payload).method("POST"))
                .await
        };
        self.finish(result)
    }
}

/// Clears the busy flag when a round ends, including by cancellation.
struct BusyGuard<'a>(&'a mut bool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

fn prepare(req: &GenerateRequest) -> bridge_core::Result<(ActionId, Value)> {
    Ok((ActionId::new(PLAYGROUND_ACTION)?, serde_json::to_value(req)?))
}
