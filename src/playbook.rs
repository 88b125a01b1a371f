//! Context playbook store
//!
//! Append-only, deduplicating. Patterns are compared by exact string
//! equality and never removed. `SharedPlaybook` serializes writers behind
//! one lock per playbook so concurrent cycles cannot interleave their
//! pattern lists.

use crate::types::ContextPlaybook;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

impl ContextPlaybook {
    /// Append `pattern` to `successful_patterns` unless already present.
    /// Returns whether it was added.
    pub fn record(&mut self, pattern: &str) -> bool {
        if self.successful_patterns.iter().any(|p| p == pattern) {
            return false;
        }
        self.successful_patterns.push(pattern.to_string());
        true
    }

    /// Record each pattern in list order. Returns how many were new.
    pub fn record_all<S: AsRef<str>>(&mut self, patterns: &[S]) -> usize {
        let mut added = 0;
        for pattern in patterns {
            if self.record(pattern.as_ref()) {
                added += 1;
            }
        }
        added
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a playbook, dropping repeated entries in every list. The first
    /// occurrence keeps its position.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut playbook: Self = serde_json::from_str(json)?;
        dedup_first_seen(&mut playbook.successful_patterns);
        dedup_first_seen(&mut playbook.common_pitfalls);
        dedup_first_seen(&mut playbook.domain_knowledge);
        Ok(playbook)
    }

    /// Read a playbook a host persisted earlier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading playbook {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("parsing playbook {}", path.display()))
    }
}

fn dedup_first_seen(entries: &mut Vec<String>) {
    let mut seen = HashSet::new();
    entries.retain(|entry| seen.insert(entry.clone()));
}

/// Functional form of [`ContextPlaybook::record`]
pub fn record_pattern(playbook: ContextPlaybook, pattern: &str) -> ContextPlaybook {
    let mut playbook = playbook;
    playbook.record(pattern);
    playbook
}

/// A playbook shared between cycles that may run on different threads
#[derive(Debug, Clone, Default)]
pub struct SharedPlaybook {
    inner: Arc<RwLock<ContextPlaybook>>,
}

impl SharedPlaybook {
    pub fn new(playbook: ContextPlaybook) -> Self {
        Self {
            inner: Arc::new(RwLock::new(playbook)),
        }
    }

    /// Consistent copy of the current state
    pub fn snapshot(&self) -> ContextPlaybook {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply a batch of patterns under a single write lock
    pub fn record_all<S: AsRef<str>>(&self, patterns: &[S]) -> usize {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.record_all(patterns)
    }
}
