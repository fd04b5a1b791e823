use std::time::Duration;

use serde::Serialize;

/// Attempt bookkeeping for the current principal. Reset on principal change and forced reload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetryState {
    pub attempt: u32,
    pub max_attempts: u32,
    pub principal_id: Option<String>,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self { Self { attempt: 0, max_attempts, principal_id: None } }

    pub fn for_principal(max_attempts: u32, principal_id: impl Into<String>) -> Self {
        Self { attempt: 0, max_attempts, principal_id: Some(principal_id.into()) }
    }

    pub fn can_retry(&self) -> bool { self.attempt < self.max_attempts }

    /// Count one failed attempt; saturates at the ceiling.
    pub fn record_failure(&mut self) -> u32 {
        if self.attempt < self.max_attempts {
            self.attempt += 1;
        }
        self.attempt
    }

    pub fn reset(&mut self, principal_id: Option<String>) {
        self.attempt = 0;
        self.principal_id = principal_id;
    }
}

/// Delay before the retry that follows failed attempt number `attempt` (1-based).
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration { base.saturating_mul(attempt.max(1)) }
