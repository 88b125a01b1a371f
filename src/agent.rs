//! Host-facing agent
//!
//! Owns an orchestrator and the playbook it evolves. Initialize once and
//! call `process_task` per problem; the playbook only changes when a cycle
//! completes.
//!
//! ```rust,ignore
//! let mut agent = AceAgent::sample();
//! let recommendation = agent.process_task(&Problem::new("Design a task queue"))?;
//! println!("{}", agent.playbook().to_json()?);
//! ```

use crate::error::CycleError;
use crate::orchestrator::{OrchestratorConfig, PhaseOrchestrator};
use crate::sample::{FixedPatternCurator, SampleGenerator, SampleReflector};
use crate::types::{ContextPlaybook, CuratedRecommendation, CycleRecord, Problem};

pub struct AceAgent {
    orchestrator: PhaseOrchestrator,
    playbook: ContextPlaybook,
    last_cycle: Option<CycleRecord>,
}

impl AceAgent {
    pub fn new(orchestrator: PhaseOrchestrator) -> Self {
        Self::with_playbook(orchestrator, ContextPlaybook::default())
    }

    /// Start from a playbook accumulated elsewhere
    pub fn with_playbook(orchestrator: PhaseOrchestrator, playbook: ContextPlaybook) -> Self {
        Self {
            orchestrator,
            playbook,
            last_cycle: None,
        }
    }

    /// Agent wired to the illustrative task-queue backends
    pub fn sample() -> Self {
        Self::sample_with_playbook(ContextPlaybook::default())
    }

    pub fn sample_with_playbook(playbook: ContextPlaybook) -> Self {
        let orchestrator =
            PhaseOrchestrator::new(SampleGenerator, SampleReflector, FixedPatternCurator::default());
        Self::with_playbook(orchestrator, playbook)
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.orchestrator = self.orchestrator.with_config(config);
        self
    }

    /// Run one full cycle and keep the evolved playbook
    pub fn process_task(&mut self, problem: &Problem) -> Result<CuratedRecommendation, CycleError> {
        let record = self.orchestrator.run_cycle_with_record(problem, &self.playbook)?;
        self.playbook = record.playbook.clone();
        let recommendation = record.recommendation.clone();
        self.last_cycle = Some(record);
        Ok(recommendation)
    }

    pub fn playbook(&self) -> &ContextPlaybook {
        &self.playbook
    }

    pub fn into_playbook(self) -> ContextPlaybook {
        self.playbook
    }

    /// Record of the most recent successful cycle
    pub fn last_cycle(&self) -> Option<&CycleRecord> {
        self.last_cycle.as_ref()
    }

    pub fn orchestrator(&self) -> &PhaseOrchestrator {
        &self.orchestrator
    }
}
