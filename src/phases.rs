//! Pluggable phase capabilities
//!
//! The orchestrator never produces solutions, analyses or learned patterns
//! itself. Hosts inject implementations of these traits at construction
//! time; `crate::sample` holds the illustrative ones.

use crate::types::{ContextPlaybook, Problem, Solution, TradeoffAnalysis};
use anyhow::Result;

/// Generate phase backend
pub trait SolutionGenerator: Send + Sync {
    /// Propose candidate solutions. Names must be unique within the result.
    fn generate(&self, problem: &Problem, playbook: &ContextPlaybook) -> Result<Vec<Solution>>;
}

/// Reflect phase backend
pub trait TradeoffReflector: Send + Sync {
    /// Exactly one analysis per input solution, in input order.
    fn reflect(
        &self,
        solutions: &[Solution],
        playbook: &ContextPlaybook,
    ) -> Result<Vec<TradeoffAnalysis>>;
}

/// Curate phase backend, source of the patterns learned in a cycle
pub trait CuratorBackend: Send + Sync {
    fn curate(
        &self,
        solutions: &[Solution],
        analyses: &[TradeoffAnalysis],
        playbook: &ContextPlaybook,
    ) -> Result<Vec<String>>;
}

impl<T: SolutionGenerator + ?Sized> SolutionGenerator for Box<T> {
    fn generate(&self, problem: &Problem, playbook: &ContextPlaybook) -> Result<Vec<Solution>> {
        (**self).generate(problem, playbook)
    }
}

impl<T: TradeoffReflector + ?Sized> TradeoffReflector for Box<T> {
    fn reflect(
        &self,
        solutions: &[Solution],
        playbook: &ContextPlaybook,
    ) -> Result<Vec<TradeoffAnalysis>> {
        (**self).reflect(solutions, playbook)
    }
}

impl<T: CuratorBackend + ?Sized> CuratorBackend for Box<T> {
    fn curate(
        &self,
        solutions: &[Solution],
        analyses: &[TradeoffAnalysis],
        playbook: &ContextPlaybook,
    ) -> Result<Vec<String>> {
        (**self).curate(solutions, analyses, playbook)
    }
}
