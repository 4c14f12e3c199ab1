//! End-to-end evaluation: match, evaluate, and package the result for rendering.

use crate::config::DeliveryRiskConfig;
use crate::core::{OutcomeRecord, PredictionRecord};
use crate::evaluation::EvaluationResult;
use crate::matching::{DuplicateKeyPolicy, MatchOutcome};
use crate::risk::{BandDistribution, BandThresholds};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Join statistics without the pairs themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub predictions: usize,
    pub outcomes: usize,
    pub matched: usize,
    pub unmatched_predictions: usize,
    pub unmatched_outcomes: usize,
    pub malformed_predictions: usize,
    pub malformed_outcomes: usize,
    pub duplicate_predictions: usize,
    pub duplicate_outcomes: usize,
}

impl MatchSummary {
    pub fn new(predictions: usize, outcomes: usize, matched: &MatchOutcome) -> Self {
        Self {
            predictions,
            outcomes,
            matched: matched.matched(),
            unmatched_predictions: matched.unmatched_predictions,
            unmatched_outcomes: matched.unmatched_outcomes,
            malformed_predictions: matched.malformed_predictions,
            malformed_outcomes: matched.malformed_outcomes,
            duplicate_predictions: matched.duplicate_predictions,
            duplicate_outcomes: matched.duplicate_outcomes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub generated_at: DateTime<Utc>,
    pub thresholds: BandThresholds,
    pub duplicate_policy: DuplicateKeyPolicy,
    /// Bands of every prediction supplied, matched or not.
    pub prediction_bands: BandDistribution,
    pub matching: MatchSummary,
    pub evaluation: EvaluationResult,
    /// Rendering limit for the miss list; the full list stays in `evaluation`.
    pub max_misses: usize,
}

/// Match `predictions` against `outcomes` and evaluate the pairs.
pub fn evaluate_records(
    predictions: &[PredictionRecord],
    outcomes: &[OutcomeRecord],
    config: &DeliveryRiskConfig,
) -> EvaluationReport {
    let matcher = config.matcher();
    let evaluator = config.evaluator();

    let matched = matcher.match_records(predictions, outcomes);
    let evaluation = evaluator.evaluate(&matched.pairs);

    EvaluationReport {
        generated_at: Utc::now(),
        thresholds: evaluator.classifier().thresholds(),
        duplicate_policy: matcher.policy(),
        prediction_bands: BandDistribution::from_records(evaluator.classifier(), predictions),
        matching: MatchSummary::new(predictions.len(), outcomes.len(), &matched),
        evaluation,
        max_misses: config.max_misses(),
    }
}
