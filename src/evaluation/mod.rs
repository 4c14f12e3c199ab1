//! Prediction accuracy evaluation over matched (prediction, outcome) pairs.
//!
//! Each pair is folded into one of four confusion-matrix cells:
//!
//! | predicted \ actual | HIGH | LOW |
//! |--------------------|------|-----|
//! | high risk          | TP   | FP  |
//! | not high risk      | FN   | TN  |
//!
//! "High risk" is [`BandClassifier::is_high_risk`]; a prediction with no
//! usable signal classifies as `Unknown` and therefore counts as not high.
//! Pairs whose outcome label is in neither vocabulary are skipped and only
//! tallied in [`EvaluationResult::unclassified`].

pub mod vocabulary;

pub use vocabulary::{LabelVocabulary, OutcomeClass, DEFAULT_HIGH_LABELS, DEFAULT_LOW_LABELS};

use crate::core::normalize::normalize_label;
use crate::core::MatchedPair;
use crate::risk::{BandClassifier, SeverityBand};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, debug_span};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissKind {
    #[serde(rename = "FP")]
    FalsePositive,
    #[serde(rename = "FN")]
    FalseNegative,
}

impl MissKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissKind::FalsePositive => "FP",
            MissKind::FalseNegative => "FN",
        }
    }
}

impl fmt::Display for MissKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A false positive or false negative, kept for human review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissRecord {
    pub kind: MissKind,
    pub key: String,
    pub predicted_band: SeverityBand,
    /// Normalized (trimmed, lower-case) outcome label.
    pub actual_label: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
    /// TP + FP + TN + FN.
    pub total_labelled: usize,
    /// Pairs skipped because their outcome label was unclassifiable.
    pub unclassified: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub misses: Vec<MissRecord>,
}

impl EvaluationResult {
    pub fn has_enough_data(&self) -> bool {
        self.total_labelled > 0
    }

    pub fn accuracy_pct(&self) -> f64 {
        percent(self.accuracy)
    }

    pub fn precision_pct(&self) -> f64 {
        percent(self.precision)
    }

    pub fn recall_pct(&self) -> f64 {
        percent(self.recall)
    }

    /// Harmonic mean of precision and recall; 0 when both are 0.
    pub fn f1(&self) -> f64 {
        let sum = self.precision + self.recall;
        if sum == 0.0 {
            0.0
        } else {
            2.0 * self.precision * self.recall / sum
        }
    }

    pub fn false_positives(&self) -> impl Iterator<Item = &MissRecord> {
        self.misses
            .iter()
            .filter(|m| m.kind == MissKind::FalsePositive)
    }

    pub fn false_negatives(&self) -> impl Iterator<Item = &MissRecord> {
        self.misses
            .iter()
            .filter(|m| m.kind == MissKind::FalseNegative)
    }

    fn finalize(mut self) -> Self {
        let tp = self.true_positive;
        let fp = self.false_positive;
        let tn = self.true_negative;
        let fn_ = self.false_negative;

        self.total_labelled = tp + fp + tn + fn_;
        self.accuracy = ratio(tp + tn, self.total_labelled);
        self.precision = ratio(tp, tp + fp);
        self.recall = ratio(tp, tp + fn_);
        self
    }
}

/// Fraction as a percentage rounded to one decimal.
pub fn percent(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evaluator {
    classifier: BandClassifier,
    vocabulary: LabelVocabulary,
}

impl Evaluator {
    pub fn new(classifier: BandClassifier, vocabulary: LabelVocabulary) -> Self {
        Self {
            classifier,
            vocabulary,
        }
    }

    pub fn classifier(&self) -> &BandClassifier {
        &self.classifier
    }

    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }

    pub fn evaluate(&self, pairs: &[MatchedPair]) -> EvaluationResult {
        let _span = debug_span!("evaluate", pairs = pairs.len()).entered();

        let result = pairs
            .iter()
            .fold(EvaluationResult::default(), |acc, pair| self.record(acc, pair))
            .finalize();

        debug!(
            tp = result.true_positive,
            fp = result.false_positive,
            tn = result.true_negative,
            fn_ = result.false_negative,
            unclassified = result.unclassified,
            "Evaluation complete"
        );
        result
    }

    fn record(&self, mut acc: EvaluationResult, pair: &MatchedPair) -> EvaluationResult {
        let band = self.classifier.classify_record(&pair.prediction);
        let predicted_high = band.is_high();
        let actual = self.vocabulary.classify(&pair.outcome.label);

        let miss = match (predicted_high, actual) {
            (_, OutcomeClass::Unclassified) => {
                acc.unclassified += 1;
                None
            }
            (true, OutcomeClass::High) => {
                acc.true_positive += 1;
                None
            }
            (true, OutcomeClass::Low) => {
                acc.false_positive += 1;
                Some(MissKind::FalsePositive)
            }
            (false, OutcomeClass::Low) => {
                acc.true_negative += 1;
                None
            }
            (false, OutcomeClass::High) => {
                acc.false_negative += 1;
                Some(MissKind::FalseNegative)
            }
        };

        if let Some(kind) = miss {
            acc.misses.push(MissRecord {
                kind,
                key: pair.key.clone(),
                predicted_band: band,
                actual_label: normalize_label(&pair.outcome.label),
            });
        }
        acc
    }
}

/// Evaluate with canonical thresholds and the default vocabulary.
pub fn evaluate(pairs: &[MatchedPair]) -> EvaluationResult {
    Evaluator::default().evaluate(pairs)
}
