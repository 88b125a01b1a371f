//! Phase Orchestrator
//!
//! Runs Generate -> Reflect -> Curate -> Done, validating each phase's
//! output before handing it to the next one. The playbook is only written
//! at the very end of Curate, so any error leaves the caller's playbook
//! exactly as it was.

use crate::error::CycleError;
use crate::phases::{CuratorBackend, SolutionGenerator, TradeoffReflector};
use crate::playbook::SharedPlaybook;
use crate::recommendation;
use crate::scoring;
use crate::types::*;
use chrono::Utc;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Retry and deadline policy applied to every backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Attempts per backend call, at least 1
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    /// A call that returns after this long has its output discarded.
    /// Checked once the call returns; a backend that never returns is not interrupted.
    pub phase_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            retry_backoff: Duration::ZERO,
            phase_timeout: None,
        }
    }
}

pub struct PhaseOrchestrator {
    generator: Box<dyn SolutionGenerator>,
    reflector: Box<dyn TradeoffReflector>,
    curator: Box<dyn CuratorBackend>,
    config: OrchestratorConfig,
    state: CycleState,
}

impl PhaseOrchestrator {
    pub fn new(
        generator: impl SolutionGenerator + 'static,
        reflector: impl TradeoffReflector + 'static,
        curator: impl CuratorBackend + 'static,
    ) -> Self {
        Self {
            generator: Box::new(generator),
            reflector: Box::new(reflector),
            curator: Box::new(curator),
            config: OrchestratorConfig::default(),
            state: CycleState::Generate,
        }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Phase the orchestrator will run next, or `Done`
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Generate phase: at least one solution, no duplicate names
    pub fn run_generate(
        &mut self,
        problem: &Problem,
        playbook: &ContextPlaybook,
    ) -> Result<Vec<Solution>, CycleError> {
        self.state = CycleState::Generate;
        let solutions = self.call_phase(CycleState::Generate, || {
            self.generator.generate(problem, playbook)
        })?;

        if solutions.is_empty() {
            return Err(CycleError::EmptyGeneration);
        }
        let mut seen = HashSet::new();
        for solution in &solutions {
            if !seen.insert(solution.name.as_str()) {
                return Err(CycleError::DuplicateSolution {
                    name: solution.name.clone(),
                });
            }
        }

        info!(count = solutions.len(), "generated solutions");
        self.state = self.state.next();
        Ok(solutions)
    }

    /// Reflect phase: exactly one analysis per solution
    pub fn run_reflect(
        &mut self,
        solutions: &[Solution],
        playbook: &ContextPlaybook,
    ) -> Result<Vec<TradeoffAnalysis>, CycleError> {
        self.state = CycleState::Reflect;
        let analyses = self.call_phase(CycleState::Reflect, || {
            self.reflector.reflect(solutions, playbook)
        })?;

        if analyses.len() != solutions.len() {
            return Err(CycleError::MisalignedAnalysis {
                solutions: solutions.len(),
                analyses: analyses.len(),
            });
        }

        for analysis in &analyses {
            debug!(
                solution = %analysis.solution_name,
                score = scoring::score(analysis),
                "scored analysis"
            );
        }
        self.state = self.state.next();
        Ok(analyses)
    }

    /// Curate phase: rank, recommend, and return the playbook with the
    /// learned patterns folded in
    pub fn run_curate(
        &mut self,
        solutions: &[Solution],
        analyses: &[TradeoffAnalysis],
        playbook: &ContextPlaybook,
    ) -> Result<(CuratedRecommendation, ContextPlaybook), CycleError> {
        let (_, recommendation) = self.curate_ranked(solutions, analyses, playbook)?;
        let evolved = fold_patterns(playbook, &recommendation.patterns_learned);
        self.state = self.state.next();
        Ok((recommendation, evolved))
    }

    /// One full cycle. The returned playbook is a new value; `playbook` is
    /// untouched whether or not the cycle succeeds.
    pub fn run_cycle(
        &mut self,
        problem: &Problem,
        playbook: &ContextPlaybook,
    ) -> Result<(CuratedRecommendation, ContextPlaybook), CycleError> {
        let record = self.run_cycle_with_record(problem, playbook)?;
        Ok((record.recommendation, record.playbook))
    }

    /// Like [`run_cycle`](Self::run_cycle) but keeps the ranking as well
    pub fn run_cycle_with_record(
        &mut self,
        problem: &Problem,
        playbook: &ContextPlaybook,
    ) -> Result<CycleRecord, CycleError> {
        let cycle_id = Uuid::new_v4().to_string();
        let span = info_span!("cycle", cycle_id = %cycle_id);
        let _guard = span.enter();
        info!(problem = problem.text(), "starting cycle");

        let solutions = self.run_generate(problem, playbook)?;
        let analyses = self.run_reflect(&solutions, playbook)?;
        let (ranking, recommendation) = self.curate_ranked(&solutions, &analyses, playbook)?;
        let evolved = fold_patterns(playbook, &recommendation.patterns_learned);
        self.state = self.state.next();

        info!(
            primary = %recommendation.primary_choice,
            patterns = evolved.successful_patterns.len(),
            "cycle complete"
        );
        Ok(CycleRecord {
            cycle_id,
            completed_at: Utc::now(),
            problem: problem.clone(),
            ranking,
            recommendation,
            playbook: evolved,
        })
    }

    /// Run a cycle against a playbook other cycles may be using. Phases see a
    /// snapshot; learned patterns are applied in one locked batch at the end.
    pub fn run_cycle_shared(
        &mut self,
        problem: &Problem,
        shared: &SharedPlaybook,
    ) -> Result<CuratedRecommendation, CycleError> {
        let snapshot = shared.snapshot();
        let record = self.run_cycle_with_record(problem, &snapshot)?;
        let added = shared.record_all(&record.recommendation.patterns_learned);
        debug!(added, "applied patterns to shared playbook");
        Ok(record.recommendation)
    }

    fn curate_ranked(
        &mut self,
        solutions: &[Solution],
        analyses: &[TradeoffAnalysis],
        playbook: &ContextPlaybook,
    ) -> Result<(Vec<RankedCandidate>, CuratedRecommendation), CycleError> {
        self.state = CycleState::Curate;
        if solutions.len() != analyses.len() {
            return Err(CycleError::MisalignedAnalysis {
                solutions: solutions.len(),
                analyses: analyses.len(),
            });
        }
        if solutions.len() < 2 {
            return Err(CycleError::InsufficientCandidates {
                count: solutions.len(),
            });
        }

        let ranked = scoring::rank(solutions, analyses);
        let patterns = self.call_phase(CycleState::Curate, || {
            self.curator.curate(solutions, analyses, playbook)
        })?;
        let recommendation = recommendation::build(&ranked, patterns)?;
        Ok((ranked, recommendation))
    }

    /// Call a backend under the retry and deadline policy
    fn call_phase<T>(
        &self,
        phase: CycleState,
        mut call: impl FnMut() -> anyhow::Result<T>,
    ) -> Result<T, CycleError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let started = Instant::now();
            let outcome = call();
            let elapsed = started.elapsed();

            let err = match outcome {
                Ok(value) => match self.config.phase_timeout {
                    Some(limit) if elapsed > limit => CycleError::PhaseTimeout {
                        phase,
                        elapsed_ms: elapsed.as_millis() as u64,
                        limit_ms: limit.as_millis() as u64,
                    },
                    _ => return Ok(value),
                },
                Err(source) => CycleError::PhaseFailed {
                    phase,
                    attempts: attempt,
                    source,
                },
            };

            if attempt >= max_attempts {
                return Err(err);
            }
            warn!(%phase, attempt, max_attempts, error = %err, "retrying phase");
            if !self.config.retry_backoff.is_zero() {
                std::thread::sleep(self.config.retry_backoff);
            }
            attempt += 1;
        }
    }
}

fn fold_patterns(playbook: &ContextPlaybook, patterns: &[String]) -> ContextPlaybook {
    let mut evolved = playbook.clone();
    let added = evolved.record_all(patterns);
    debug!(added, total = evolved.successful_patterns.len(), "recorded patterns");
    evolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{FixedPatternCurator, SampleGenerator, SampleReflector};
    use anyhow::{bail, Result};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedGenerator(Vec<Solution>);

    impl SolutionGenerator for FixedGenerator {
        fn generate(&self, _: &Problem, _: &ContextPlaybook) -> Result<Vec<Solution>> {
            Ok(self.0.clone())
        }
    }

    struct FixedReflector(Vec<TradeoffAnalysis>);

    impl TradeoffReflector for FixedReflector {
        fn reflect(&self, _: &[Solution], _: &ContextPlaybook) -> Result<Vec<TradeoffAnalysis>> {
            Ok(self.0.clone())
        }
    }

    /// Fails the first `failures` calls, then delegates to the sample reflector
    struct FlakyReflector {
        failures: u32,
        calls: AtomicU32,
    }

    impl TradeoffReflector for FlakyReflector {
        fn reflect(
            &self,
            solutions: &[Solution],
            playbook: &ContextPlaybook,
        ) -> Result<Vec<TradeoffAnalysis>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                bail!("reflector unavailable");
            }
            SampleReflector.reflect(solutions, playbook)
        }
    }

    struct SlowGenerator(Duration);

    impl SolutionGenerator for SlowGenerator {
        fn generate(
            &self,
            problem: &Problem,
            playbook: &ContextPlaybook,
        ) -> Result<Vec<Solution>> {
            std::thread::sleep(self.0);
            SampleGenerator.generate(problem, playbook)
        }
    }

    fn solution(name: &str) -> Solution {
        Solution {
            name: name.into(),
            description: format!("{name} description"),
            implementation_steps: vec![format!("{name} step 1"), format!("{name} step 2")],
            assumptions: vec![],
        }
    }

    fn analysis(name: &str, ratings: [Rating; 4]) -> TradeoffAnalysis {
        let [perf, maint, sec, cost] = ratings;
        TradeoffAnalysis::new(name, perf, maint, sec, cost, vec![format!("{name} risk")])
    }

    fn problem() -> Problem {
        Problem::new("Design a task queue")
    }

    fn orchestrator(solutions: Vec<Solution>, analyses: Vec<TradeoffAnalysis>) -> PhaseOrchestrator {
        PhaseOrchestrator::new(
            FixedGenerator(solutions),
            FixedReflector(analyses),
            FixedPatternCurator::default(),
        )
    }

    fn sample_orchestrator() -> PhaseOrchestrator {
        PhaseOrchestrator::new(SampleGenerator, SampleReflector, FixedPatternCurator::default())
    }

    use crate::types::Rating::{High, Low, Medium};

    #[test]
    fn test_end_to_end_ranking_and_patterns() {
        let solutions = vec![solution("A"), solution("B"), solution("C")];
        let analyses = vec![
            analysis("A", [High, Medium, Medium, Medium]), // 9
            analysis("B", [High, High, High, Medium]),     // 11
            analysis("C", [Medium, Medium, Medium, Medium]), // 8
        ];
        let mut orch = orchestrator(solutions, analyses);
        let playbook = ContextPlaybook::default();

        let (rec, evolved) = orch.run_cycle(&problem(), &playbook).unwrap();

        assert_eq!(rec.primary_choice, "B");
        assert!(rec.alternative.starts_with("A - "));
        assert_eq!(rec.implementation_guidance[0], "Start with: B step 1");
        assert_eq!(rec.implementation_guidance[2], "Pivot if: B risk");
        assert_eq!(evolved.successful_patterns, rec.patterns_learned);
        assert_eq!(orch.state(), CycleState::Done);
        assert!(playbook.successful_patterns.is_empty());
    }

    #[test]
    fn test_sample_cycle_recommends_redis() {
        let mut orch = sample_orchestrator();
        let record = orch
            .run_cycle_with_record(&problem(), &ContextPlaybook::default())
            .unwrap();

        assert_eq!(record.recommendation.primary_choice, "Solution B - Redis-backed Queue");
        assert_eq!(
            record.recommendation.alternative,
            "Solution A - Simple In-Memory Queue - Use if you need medium security"
        );
        assert_eq!(
            record.recommendation.rationale,
            "Best balance of high performance, high maintainability, and medium cost"
        );
        let scores: Vec<i32> = record.ranking.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![11, 10, 9]);
        assert_eq!(record.playbook.successful_patterns.len(), 3);
    }

    #[test]
    fn test_ties_keep_generation_order() {
        let solutions = vec![solution("First"), solution("Second"), solution("Third")];
        let analyses = vec![
            analysis("First", [High, Medium, Low, Medium]),  // 8
            analysis("Second", [Medium, Medium, Low, Low]),  // 8
            analysis("Third", [Low, Low, Low, High]),        // 4
        ];
        let mut orch = orchestrator(solutions, analyses);
        let (rec, _) = orch.run_cycle(&problem(), &ContextPlaybook::default()).unwrap();
        assert_eq!(rec.primary_choice, "First");
        assert!(rec.alternative.starts_with("Second - "));
    }

    #[test]
    fn test_repeated_cycles_do_not_duplicate_patterns() {
        let mut orch = sample_orchestrator();
        let (_, once) = orch.run_cycle(&problem(), &ContextPlaybook::default()).unwrap();
        let (_, twice) = orch.run_cycle(&problem(), &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_existing_patterns_keep_their_position() {
        let playbook = ContextPlaybook {
            successful_patterns: vec![
                "Start simple, migrate to complex as needed".into(),
                "Measure before optimizing".into(),
            ],
            ..Default::default()
        };
        let mut orch = sample_orchestrator();
        let (_, evolved) = orch.run_cycle(&problem(), &playbook).unwrap();
        assert_eq!(
            evolved.successful_patterns,
            vec![
                "Start simple, migrate to complex as needed",
                "Measure before optimizing",
                "Simple solutions often best for MVP",
                "Consider operational complexity in trade-offs",
            ]
        );
    }

    #[test]
    fn test_empty_generation_aborts() {
        let mut orch = orchestrator(vec![], vec![]);
        let err = orch.run_cycle(&problem(), &ContextPlaybook::default()).unwrap_err();
        assert!(matches!(err, CycleError::EmptyGeneration));
        assert_eq!(err.phase(), CycleState::Generate);
    }

    #[test]
    fn test_duplicate_names_abort() {
        let mut orch = orchestrator(vec![solution("A"), solution("A")], vec![]);
        let err = orch
            .run_generate(&problem(), &ContextPlaybook::default())
            .unwrap_err();
        assert!(matches!(err, CycleError::DuplicateSolution { name } if name == "A"));
    }

    #[test]
    fn test_reflect_rejects_misaligned_analyses() {
        let solutions = vec![solution("A"), solution("B"), solution("C")];
        let analyses = vec![
            analysis("A", [High, High, High, Low]),
            analysis("B", [High, High, High, Low]),
        ];
        let mut orch = orchestrator(solutions.clone(), analyses);
        let err = orch
            .run_reflect(&solutions, &ContextPlaybook::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CycleError::MisalignedAnalysis {
                solutions: 3,
                analyses: 2
            }
        ));
        assert_eq!(orch.state(), CycleState::Reflect);
    }

    #[test]
    fn test_curate_needs_two_candidates() {
        let solutions = vec![solution("A")];
        let analyses = vec![analysis("A", [High, High, High, Low])];
        let mut orch = orchestrator(solutions.clone(), analyses.clone());
        let playbook = ContextPlaybook::default();
        let err = orch.run_curate(&solutions, &analyses, &playbook).unwrap_err();
        assert!(matches!(err, CycleError::InsufficientCandidates { count: 1 }));

        let err = orch.run_cycle(&problem(), &playbook).unwrap_err();
        assert!(matches!(err, CycleError::InsufficientCandidates { count: 1 }));
    }

    #[test]
    fn test_incomplete_top_solution_leaves_playbook_untouched() {
        let mut bare = solution("A");
        bare.implementation_steps.clear();
        let solutions = vec![bare, solution("B")];
        let analyses = vec![
            analysis("A", [High, High, High, Low]),
            analysis("B", [Low, Low, Low, High]),
        ];
        let shared = SharedPlaybook::default();
        let mut orch = orchestrator(solutions, analyses);

        let err = orch.run_cycle_shared(&problem(), &shared).unwrap_err();
        assert!(matches!(err, CycleError::IncompleteSolution { .. }));
        assert!(shared.snapshot().successful_patterns.is_empty());
    }

    #[test]
    fn test_run_curate_advances_to_done() {
        let solutions = vec![solution("A"), solution("B")];
        let analyses = vec![
            analysis("A", [Low, Low, Low, High]),
            analysis("B", [High, High, High, Low]),
        ];
        let mut orch = orchestrator(solutions.clone(), analyses.clone());
        let (rec, evolved) = orch
            .run_curate(&solutions, &analyses, &ContextPlaybook::default())
            .unwrap();
        assert_eq!(rec.primary_choice, "B");
        assert_eq!(evolved.successful_patterns.len(), 3);
        assert_eq!(orch.state(), CycleState::Done);
    }

    #[test]
    fn test_backend_failure_is_retried_up_to_limit() {
        let mut orch = PhaseOrchestrator::new(
            SampleGenerator,
            FlakyReflector {
                failures: 1,
                calls: AtomicU32::new(0),
            },
            FixedPatternCurator::default(),
        );
        let err = orch
            .run_cycle(&problem(), &ContextPlaybook::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CycleError::PhaseFailed {
                phase: CycleState::Reflect,
                attempts: 1,
                ..
            }
        ));

        let mut orch = PhaseOrchestrator::new(
            SampleGenerator,
            FlakyReflector {
                failures: 1,
                calls: AtomicU32::new(0),
            },
            FixedPatternCurator::default(),
        )
        .with_config(OrchestratorConfig {
            max_attempts: 2,
            ..Default::default()
        });
        assert!(orch.run_cycle(&problem(), &ContextPlaybook::default()).is_ok());
    }

    #[test]
    fn test_slow_phase_times_out() {
        let mut orch = PhaseOrchestrator::new(
            SlowGenerator(Duration::from_millis(30)),
            SampleReflector,
            FixedPatternCurator::default(),
        )
        .with_config(OrchestratorConfig {
            phase_timeout: Some(Duration::from_millis(5)),
            ..Default::default()
        });
        let err = orch
            .run_cycle(&problem(), &ContextPlaybook::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CycleError::PhaseTimeout {
                phase: CycleState::Generate,
                limit_ms: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_concurrent_cycles_share_one_playbook() {
        let shared = SharedPlaybook::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    let mut orch = sample_orchestrator();
                    orch.run_cycle_shared(&problem(), &shared).map(|r| r.primary_choice)
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().unwrap(), "Solution B - Redis-backed Queue");
        }
        let snapshot = shared.snapshot();
        assert_eq!(snapshot.successful_patterns.len(), 3);
    }
}
