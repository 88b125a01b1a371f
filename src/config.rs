//! Configuration management

use crate::orchestrator::OrchestratorConfig;
use crate::sample::SAMPLE_PROBLEM;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the `ace` binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AceConfig {
    /// Attempts per backend call (ACE_MAX_ATTEMPTS)
    pub max_attempts: u32,

    /// Pause between attempts in milliseconds (ACE_RETRY_BACKOFF_MS)
    pub retry_backoff_ms: u64,

    /// Per-phase deadline in milliseconds (ACE_PHASE_TIMEOUT_MS)
    pub phase_timeout_ms: Option<u64>,

    /// Playbook to seed the agent with (ACE_PLAYBOOK_PATH)
    pub playbook_path: Option<PathBuf>,

    /// Problem statement for the cycle (ACE_PROBLEM)
    pub problem: String,
}

impl Default for AceConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            retry_backoff_ms: 0,
            phase_timeout_ms: None,
            playbook_path: None,
            problem: SAMPLE_PROBLEM.to_string(),
        }
    }
}

impl AceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup. Unparseable values fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_attempts = lookup("ACE_MAX_ATTEMPTS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(defaults.max_attempts)
            .max(1);

        let retry_backoff_ms = lookup("ACE_RETRY_BACKOFF_MS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.retry_backoff_ms);

        let phase_timeout_ms = lookup("ACE_PHASE_TIMEOUT_MS").and_then(|v| v.trim().parse().ok());

        let playbook_path = lookup("ACE_PLAYBOOK_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let problem = lookup("ACE_PROBLEM")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.problem);

        Self {
            max_attempts,
            retry_backoff_ms,
            phase_timeout_ms,
            playbook_path,
            problem,
        }
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_attempts: self.max_attempts,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            phase_timeout: self.phase_timeout_ms.map(Duration::from_millis),
        }
    }
}
