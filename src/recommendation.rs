//! Recommendation builder for the Curate phase

use crate::error::{CycleError, MissingField};
use crate::types::{CuratedRecommendation, RankedCandidate};

pub const MONITORING_DIRECTIVE: &str = "Monitor for: Task processing latency, queue depth";

/// Assemble the recommendation from ranked candidates, best first.
///
/// Needs at least two candidates, and the top one needs a first
/// implementation step and a first risk to derive guidance from.
pub fn build(
    ranked: &[RankedCandidate],
    patterns_learned: Vec<String>,
) -> Result<CuratedRecommendation, CycleError> {
    let (best, second) = match ranked {
        [best, second, ..] => (best, second),
        _ => {
            return Err(CycleError::InsufficientCandidates {
                count: ranked.len(),
            })
        }
    };

    let first_step = best.solution.implementation_steps.first().ok_or_else(|| {
        CycleError::IncompleteSolution {
            solution: best.solution.name.clone(),
            missing: MissingField::ImplementationSteps,
        }
    })?;
    let first_risk = best
        .analysis
        .risks
        .first()
        .ok_or_else(|| CycleError::IncompleteSolution {
            solution: best.solution.name.clone(),
            missing: MissingField::Risks,
        })?;

    let rationale = format!(
        "Best balance of {} performance, {} maintainability, and {} cost",
        best.analysis.performance.to_lowercase(),
        best.analysis.maintainability.to_lowercase(),
        best.analysis.cost.to_lowercase()
    );
    let alternative = format!(
        "{} - Use if you need {} security",
        second.solution.name,
        second.analysis.security.to_lowercase()
    );

    Ok(CuratedRecommendation {
        primary_choice: best.solution.name.clone(),
        rationale,
        alternative,
        implementation_guidance: vec![
            format!("Start with: {}", first_step),
            MONITORING_DIRECTIVE.to_string(),
            format!("Pivot if: {}", first_risk),
        ],
        patterns_learned,
    })
}
