//! Step accounting for multi-step flows with mixed failure policy.

use std::{fmt::Display, future::Future};

use serde::Serialize;
use tracing::{error, warn};
use ts_rs::TS;

/// Failure policy for a single step in a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSeverity {
    /// A failure aborts the remaining steps and fails the flow.
    Fatal,
    /// A failure is logged and recorded; the flow continues.
    BestEffort,
}

/// A best-effort step that failed during a flow run.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
pub struct StepFailure {
    pub step: String,
    pub message: String,
}

/// Runs the steps of one flow invocation in order.
///
/// Fatal steps are logged here and their error handed back unchanged, so the
/// calling service aborts with `?` and nothing later executes. Best-effort
/// steps swallow their error into a [`StepFailure`] record instead; the flow's
/// outcome carries those records so callers can see which side effects were
/// skipped.
pub struct Workflow {
    flow: &'static str,
    soft_failures: Vec<StepFailure>,
}

impl Workflow {
    pub fn new(flow: &'static str) -> Self {
        Self {
            flow,
            soft_failures: Vec::new(),
        }
    }

    /// Run a step whose failure aborts the flow.
    pub async fn fatal<T, E, Fut>(&mut self, step: &'static str, fut: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        match fut.await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.log_failure(step, StepSeverity::Fatal, &err);
                Err(err)
            }
        }
    }

    /// Run a step whose failure is tolerated and recorded.
    pub async fn best_effort<T, E, Fut>(&mut self, step: &'static str, fut: Fut) -> Option<T>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        match fut.await {
            Ok(value) => Some(value),
            Err(err) => {
                self.record_soft_failure(step, err);
                None
            }
        }
    }

    /// Record a best-effort failure observed outside an awaited step, such as
    /// one arm of a joined pair.
    pub fn record_soft_failure(&mut self, step: &'static str, err: impl Display) {
        self.log_failure(step, StepSeverity::BestEffort, &err);
        self.soft_failures.push(StepFailure {
            step: step.to_string(),
            message: err.to_string(),
        });
    }

    pub fn soft_failures(&self) -> &[StepFailure] {
        &self.soft_failures
    }

    pub fn into_soft_failures(self) -> Vec<StepFailure> {
        self.soft_failures
    }

    fn log_failure<E: Display>(&self, step: &'static str, severity: StepSeverity, err: &E) {
        match severity {
            StepSeverity::Fatal => {
                error!(flow = self.flow, step, error = %err, "fatal step failed");
            }
            StepSeverity::BestEffort => {
                warn!(flow = self.flow, step, error = %err, "best-effort step failed, continuing");
            }
        }
    }
}
