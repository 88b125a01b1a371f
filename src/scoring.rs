//! Trade-off scoring and ranking
//!
//! High=3, Medium=2, Low=1, anything else 0. Cost is inverted as `4 - x`
//! because cheaper is better. Scores are plain integers with no normalization.

use crate::types::{RankedCandidate, Rating, Solution, TradeoffAnalysis};
use std::cmp::Reverse;

/// Numeric value of a qualitative label, 0 when unrecognized
pub fn rating_value(label: &str) -> i32 {
    Rating::from_label(label).map(|r| r.value()).unwrap_or(0)
}

/// Score an analysis. Pure: the same analysis always yields the same score.
pub fn score(analysis: &TradeoffAnalysis) -> i32 {
    let cost_component = 4 - rating_value(&analysis.cost);
    rating_value(&analysis.performance)
        + rating_value(&analysis.maintainability)
        + rating_value(&analysis.security)
        + cost_component
}

/// Pair solutions with their analyses and order them by score, best first.
///
/// The sort is stable, so equal scores keep generation order. Callers must
/// have checked that both slices have the same length; extra entries on
/// either side are ignored.
pub fn rank(solutions: &[Solution], analyses: &[TradeoffAnalysis]) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = solutions
        .iter()
        .zip(analyses)
        .enumerate()
        .map(|(position, (solution, analysis))| RankedCandidate {
            position,
            solution: solution.clone(),
            analysis: analysis.clone(),
            score: score(analysis),
        })
        .collect();

    ranked.sort_by_key(|c| Reverse(c.score));
    ranked
}
