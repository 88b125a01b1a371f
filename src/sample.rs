//! Illustrative phase backends
//!
//! Canned data for a task-queue design problem. In production each of
//! these would be a call to a generative backend that receives the
//! playbook as context.

use crate::phases::{CuratorBackend, SolutionGenerator, TradeoffReflector};
use crate::types::{ContextPlaybook, Problem, Rating, Solution, TradeoffAnalysis};
use anyhow::Result;

pub const SAMPLE_PROBLEM: &str =
    "Design a task queue system for a web application that processes user uploads";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Always proposes the same three task-queue designs
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleGenerator;

impl SolutionGenerator for SampleGenerator {
    fn generate(&self, problem: &Problem, playbook: &ContextPlaybook) -> Result<Vec<Solution>> {
        tracing::debug!(
            problem = problem.text(),
            known_patterns = playbook.successful_patterns.len(),
            "sample generator ignores its inputs"
        );
        Ok(vec![
            Solution {
                name: "Solution A - Simple In-Memory Queue".into(),
                description: "Use an in-process queue drained by a pool of worker threads".into(),
                implementation_steps: strings(&[
                    "Create a bounded in-memory channel",
                    "Spawn worker threads that consume from the channel",
                    "Enqueue upload jobs from request handlers",
                    "Join workers on shutdown",
                ]),
                assumptions: strings(&[
                    "Single server deployment",
                    "Tasks complete quickly (< 1 minute)",
                    "OK to lose tasks on restart",
                ]),
            },
            Solution {
                name: "Solution B - Redis-backed Queue".into(),
                description: "Use Redis with a worker pool for persistence".into(),
                implementation_steps: strings(&[
                    "Set up Redis server",
                    "Push jobs onto a Redis list or stream",
                    "Define idempotent job handlers",
                    "Start worker processes",
                ]),
                assumptions: strings(&[
                    "Redis infrastructure available",
                    "Need task persistence",
                    "Multiple workers possible",
                ]),
            },
            Solution {
                name: "Solution C - Cloud Queue Service".into(),
                description: "Use AWS SQS or Google Cloud Tasks".into(),
                implementation_steps: strings(&[
                    "Configure cloud provider credentials",
                    "Create queue in cloud console",
                    "Use SDK to send/receive messages",
                    "Deploy workers as serverless functions",
                ]),
                assumptions: strings(&[
                    "Cloud budget available",
                    "Need high scalability",
                    "OK with vendor lock-in",
                ]),
            },
        ])
    }
}

/// Canned assessments keyed by solution label
const SAMPLE_ANALYSES: &[(&str, [Rating; 4], [&str; 3])] = &[
    (
        "Solution A",
        [Rating::High, Rating::Medium, Rating::Medium, Rating::Low],
        [
            "Tasks lost on server restart",
            "No built-in retry mechanism",
            "Difficult to scale horizontally",
        ],
    ),
    (
        "Solution B",
        [Rating::High, Rating::High, Rating::High, Rating::Medium],
        [
            "Redis becomes single point of failure",
            "Need to manage Redis infrastructure",
            "Network latency to Redis",
        ],
    ),
    (
        "Solution C",
        [Rating::Medium, Rating::High, Rating::High, Rating::High],
        [
            "Vendor lock-in",
            "Cold start latency for serverless",
            "Cost can spike with high volume",
        ],
    ),
];

/// Looks solutions up in a fixed table. Unknown solutions get a neutral
/// Medium across the board so the output stays aligned with the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleReflector;

impl SampleReflector {
    fn analyze(solution: &Solution) -> TradeoffAnalysis {
        let label = solution
            .name
            .split(" - ")
            .next()
            .unwrap_or(&solution.name)
            .trim();

        match SAMPLE_ANALYSES.iter().find(|(key, _, _)| *key == label) {
            Some((key, [perf, maint, sec, cost], risks)) => {
                TradeoffAnalysis::new(*key, *perf, *maint, *sec, *cost, strings(risks))
            }
            None => TradeoffAnalysis::new(
                label,
                Rating::Medium,
                Rating::Medium,
                Rating::Medium,
                Rating::Medium,
                vec![format!("{} has not been assessed", solution.name)],
            ),
        }
    }
}

impl TradeoffReflector for SampleReflector {
    fn reflect(
        &self,
        solutions: &[Solution],
        _playbook: &ContextPlaybook,
    ) -> Result<Vec<TradeoffAnalysis>> {
        Ok(solutions.iter().map(Self::analyze).collect())
    }
}

pub const SAMPLE_PATTERNS: [&str; 3] = [
    "Simple solutions often best for MVP",
    "Consider operational complexity in trade-offs",
    "Start simple, migrate to complex as needed",
];

/// Returns the same heuristic patterns every cycle
#[derive(Debug, Clone)]
pub struct FixedPatternCurator {
    patterns: Vec<String>,
}

impl FixedPatternCurator {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}

impl Default for FixedPatternCurator {
    fn default() -> Self {
        Self::new(strings(&SAMPLE_PATTERNS))
    }
}

impl CuratorBackend for FixedPatternCurator {
    fn curate(
        &self,
        _solutions: &[Solution],
        _analyses: &[TradeoffAnalysis],
        _playbook: &ContextPlaybook,
    ) -> Result<Vec<String>> {
        Ok(self.patterns.clone())
    }
}
