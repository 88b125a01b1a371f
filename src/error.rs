//! Cycle errors
//!
//! Every variant aborts the current cycle. None of them leave a partially
//! updated playbook behind.

use crate::types::CycleState;
use thiserror::Error;

/// Which piece of guidance input the top candidate was missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    ImplementationSteps,
    Risks,
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingField::ImplementationSteps => f.write_str("implementation steps"),
            MissingField::Risks => f.write_str("risks"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("generate phase: solution generator returned no solutions")]
    EmptyGeneration,

    #[error("generate phase: solution name {name:?} appears more than once")]
    DuplicateSolution { name: String },

    #[error("reflect phase: misaligned analysis, {solutions} solution(s) but {analyses} analysis(es)")]
    MisalignedAnalysis { solutions: usize, analyses: usize },

    #[error("curate phase: insufficient candidates, need at least 2 to rank but got {count}")]
    InsufficientCandidates { count: usize },

    #[error("curate phase: incomplete solution {solution:?}, top candidate has no {missing}")]
    IncompleteSolution {
        solution: String,
        missing: MissingField,
    },

    #[error("{phase} phase: backend failed after {attempts} attempt(s): {source}")]
    PhaseFailed {
        phase: CycleState,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("{phase} phase: backend took {elapsed_ms}ms, limit is {limit_ms}ms")]
    PhaseTimeout {
        phase: CycleState,
        elapsed_ms: u64,
        limit_ms: u64,
    },
}

impl CycleError {
    /// Phase in which the error was raised
    pub fn phase(&self) -> CycleState {
        match self {
            CycleError::EmptyGeneration | CycleError::DuplicateSolution { .. } => {
                CycleState::Generate
            }
            CycleError::MisalignedAnalysis { .. } => CycleState::Reflect,
            CycleError::InsufficientCandidates { .. } | CycleError::IncompleteSolution { .. } => {
                CycleState::Curate
            }
            CycleError::PhaseFailed { phase, .. } | CycleError::PhaseTimeout { phase, .. } => {
                *phase
            }
        }
    }

    /// Backend failures and timeouts may succeed on another attempt;
    /// precondition violations never will.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CycleError::PhaseFailed { .. } | CycleError::PhaseTimeout { .. }
        )
    }
}
