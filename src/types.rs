//! Core types for the Generate -> Reflect -> Curate cycle
//!
//! A cycle reads a `Problem`, produces `Solution`s, reflects on them as
//! `TradeoffAnalysis`es and curates a single `CuratedRecommendation`.
//! The `ContextPlaybook` is the only state that outlives a cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque problem statement, immutable for the duration of a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Problem(String);

impl Problem {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A proposed solution from the Generate phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Unique within a cycle
    pub name: String,
    pub description: String,
    pub implementation_steps: Vec<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
}

/// Qualitative assessment level used by the Reflect phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rating {
    Low,
    Medium,
    High,
}

impl Rating {
    /// Parse a qualitative label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "high" => Some(Rating::High),
            "medium" => Some(Rating::Medium),
            "low" => Some(Rating::Low),
            _ => None,
        }
    }

    pub fn value(&self) -> i32 {
        match self {
            Rating::High => 3,
            Rating::Medium => 2,
            Rating::Low => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rating::High => "High",
            Rating::Medium => "Medium",
            Rating::Low => "Low",
        }
    }
}

/// Trade-off analysis of one solution from the Reflect phase
///
/// Qualitative fields stay free text so that a reflector backend can return
/// whatever it produced; the scorer decides how to read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeoffAnalysis {
    pub solution_name: String,
    pub performance: String,
    pub maintainability: String,
    pub security: String,
    pub cost: String,
    pub risks: Vec<String>,
}

impl TradeoffAnalysis {
    pub fn new(
        solution_name: impl Into<String>,
        performance: Rating,
        maintainability: Rating,
        security: Rating,
        cost: Rating,
        risks: Vec<String>,
    ) -> Self {
        Self {
            solution_name: solution_name.into(),
            performance: performance.name().to_string(),
            maintainability: maintainability.name().to_string(),
            security: security.name().to_string(),
            cost: cost.name().to_string(),
            risks,
        }
    }
}

/// Final output of the Curate phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedRecommendation {
    pub primary_choice: String,
    pub rationale: String,
    pub alternative: String,
    pub implementation_guidance: Vec<String>,
    pub patterns_learned: Vec<String>,
}

/// Accumulated knowledge carried across cycles
///
/// Every list is insertion-ordered and free of duplicates. Entries are only
/// ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPlaybook {
    #[serde(default)]
    pub successful_patterns: Vec<String>,
    #[serde(default)]
    pub common_pitfalls: Vec<String>,
    #[serde(default)]
    pub domain_knowledge: Vec<String>,
}

/// Position of the orchestrator within a cycle
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CycleState {
    #[default]
    Generate,
    Reflect,
    Curate,
    Done,
}

impl CycleState {
    pub fn name(&self) -> &'static str {
        match self {
            CycleState::Generate => "generate",
            CycleState::Reflect => "reflect",
            CycleState::Curate => "curate",
            CycleState::Done => "done",
        }
    }

    /// The single linear transition path
    pub fn next(&self) -> CycleState {
        match self {
            CycleState::Generate => CycleState::Reflect,
            CycleState::Reflect => CycleState::Curate,
            CycleState::Curate | CycleState::Done => CycleState::Done,
        }
    }
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A (solution, analysis) pair after ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Index of the solution in the Generate phase output
    pub position: usize,
    pub solution: Solution,
    pub analysis: TradeoffAnalysis,
    pub score: i32,
}

/// Everything a host may want to keep from one successful cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle_id: String,
    pub completed_at: DateTime<Utc>,
    pub problem: Problem,
    pub ranking: Vec<RankedCandidate>,
    pub recommendation: CuratedRecommendation,
    pub playbook: ContextPlaybook,
}
