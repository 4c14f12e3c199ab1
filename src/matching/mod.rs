//! Join predictions against ground-truth outcomes on the business key.
//!
//! Keys are trimmed and compared case-sensitively. Records with a blank key
//! are skipped and counted as malformed. Duplicate keys on either side are
//! resolved by an explicit [`DuplicateKeyPolicy`], so the result depends only
//! on input order and never on hash iteration order.
//!
//! Count conservation, for any input:
//!
//! ```text
//! pairs + unmatched_outcomes + malformed_outcomes == outcomes
//! ```
//!
//! An outcome superseded by a duplicate key is unmatched; `duplicate_outcomes`
//! breaks that share out of `unmatched_outcomes`.

use crate::core::normalize::normalize_key;
use crate::core::{MatchedPair, OutcomeRecord, PredictionRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, debug_span, warn};

/// Which record survives when several share a key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// The record appearing last in input order wins.
    #[default]
    KeepLast,
    /// The record appearing first in input order wins.
    KeepFirst,
}

impl DuplicateKeyPolicy {
    fn replaces_existing(&self) -> bool {
        matches!(self, DuplicateKeyPolicy::KeepLast)
    }
}

/// Result of joining a prediction set with an outcome set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchOutcome {
    /// Matched pairs, in outcome input order.
    pub pairs: Vec<MatchedPair>,
    /// Distinct well-formed prediction keys no outcome referred to.
    pub unmatched_predictions: usize,
    /// Well-formed outcomes that did not end up in a pair, superseded
    /// duplicates included.
    pub unmatched_outcomes: usize,
    pub malformed_predictions: usize,
    pub malformed_outcomes: usize,
    /// Predictions superseded by another record with the same key.
    pub duplicate_predictions: usize,
    /// Outcomes superseded by another record with the same key. Already
    /// included in `unmatched_outcomes`.
    pub duplicate_outcomes: usize,
}

impl MatchOutcome {
    pub fn matched(&self) -> usize {
        self.pairs.len()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RecordMatcher {
    policy: DuplicateKeyPolicy,
}

impl RecordMatcher {
    pub fn new(policy: DuplicateKeyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DuplicateKeyPolicy {
        self.policy
    }

    pub fn match_records(
        &self,
        predictions: &[PredictionRecord],
        outcomes: &[OutcomeRecord],
    ) -> MatchOutcome {
        let _span = debug_span!(
            "match_records",
            predictions = predictions.len(),
            outcomes = outcomes.len()
        )
        .entered();

        let mut result = MatchOutcome::default();
        let index = self.index_predictions(predictions, &mut result);
        let survivors = self.surviving_outcomes(outcomes, &mut result);

        let mut matched_keys: HashSet<&str> = HashSet::new();
        for (key, outcome) in survivors {
            match index.get(key) {
                Some(prediction) => {
                    matched_keys.insert(key);
                    result.pairs.push(MatchedPair {
                        key: key.to_string(),
                        prediction: (*prediction).clone(),
                        outcome: outcome.clone(),
                    });
                }
                None => result.unmatched_outcomes += 1,
            }
        }
        result.unmatched_predictions = index.len() - matched_keys.len();

        if result.malformed_predictions + result.malformed_outcomes > 0 {
            warn!(
                malformed_predictions = result.malformed_predictions,
                malformed_outcomes = result.malformed_outcomes,
                "Skipped records with a blank key"
            );
        }
        debug!(
            matched = result.pairs.len(),
            unmatched_predictions = result.unmatched_predictions,
            unmatched_outcomes = result.unmatched_outcomes,
            "Matching complete"
        );
        result
    }

    fn index_predictions<'a>(
        &self,
        predictions: &'a [PredictionRecord],
        result: &mut MatchOutcome,
    ) -> HashMap<&'a str, &'a PredictionRecord> {
        let mut index: HashMap<&str, &PredictionRecord> = HashMap::with_capacity(predictions.len());
        for prediction in predictions {
            let Some(key) = normalize_key(&prediction.key) else {
                result.malformed_predictions += 1;
                continue;
            };
            if index.contains_key(key) {
                result.duplicate_predictions += 1;
                warn!(key, policy = ?self.policy, "Duplicate prediction key");
                if !self.policy.replaces_existing() {
                    continue;
                }
            }
            index.insert(key, prediction);
        }
        index
    }

    /// Well-formed outcomes that survive the duplicate policy, in input order.
    fn surviving_outcomes<'a>(
        &self,
        outcomes: &'a [OutcomeRecord],
        result: &mut MatchOutcome,
    ) -> Vec<(&'a str, &'a OutcomeRecord)> {
        let keyed: Vec<(usize, &str)> = outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, outcome)| match normalize_key(&outcome.key) {
                Some(key) => Some((i, key)),
                None => {
                    result.malformed_outcomes += 1;
                    None
                }
            })
            .collect();

        let mut survivor_of: HashMap<&str, usize> = HashMap::with_capacity(keyed.len());
        for &(i, key) in &keyed {
            if let Some(existing) = survivor_of.get_mut(key) {
                result.duplicate_outcomes += 1;
                result.unmatched_outcomes += 1;
                warn!(key, policy = ?self.policy, "Duplicate outcome key");
                if self.policy.replaces_existing() {
                    *existing = i;
                }
            } else {
                survivor_of.insert(key, i);
            }
        }

        keyed
            .into_iter()
            .filter(|(i, key)| survivor_of.get(key) == Some(i))
            .map(|(i, key)| (key, &outcomes[i]))
            .collect()
    }
}

/// Match with the default last-write-wins policy.
pub fn match_records(predictions: &[PredictionRecord], outcomes: &[OutcomeRecord]) -> MatchOutcome {
    RecordMatcher::default().match_records(predictions, outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn preds(items: &[(&str, f64)]) -> Vec<PredictionRecord> {
        items
            .iter()
            .map(|(k, s)| PredictionRecord::with_score(*k, *s))
            .collect()
    }

    fn outs(items: &[(&str, &str)]) -> Vec<OutcomeRecord> {
        items.iter().map(|(k, l)| OutcomeRecord::new(*k, *l)).collect()
    }

    #[test]
    fn test_basic_join() {
        let result = match_records(
            &preds(&[("A", 80.0), ("B", 20.0), ("X", 40.0)]),
            &outs(&[("A", "late"), ("B", "on_time"), ("Z", "late")]),
        );

        assert_eq!(result.matched(), 2);
        assert_eq!(result.pairs[0].key, "A");
        assert_eq!(result.pairs[1].key, "B");
        assert_eq!(result.unmatched_outcomes, 1);
        assert_eq!(result.unmatched_predictions, 1);
    }

    #[test]
    fn test_keys_are_trimmed_and_case_sensitive() {
        let result = match_records(
            &preds(&[(" PROJ-1 ", 80.0), ("proj-2", 10.0)]),
            &outs(&[("PROJ-1", "late"), ("PROJ-2", "late")]),
        );

        assert_eq!(result.matched(), 1);
        assert_eq!(result.pairs[0].key, "PROJ-1");
        assert_eq!(result.unmatched_outcomes, 1);
    }

    #[test]
    fn test_blank_keys_are_malformed() {
        let result = match_records(
            &preds(&[("", 80.0), ("  ", 80.0), ("A", 80.0)]),
            &outs(&[("", "late"), ("A", "late")]),
        );

        assert_eq!(result.malformed_predictions, 2);
        assert_eq!(result.malformed_outcomes, 1);
        assert_eq!(result.matched(), 1);
        assert_eq!(result.unmatched_outcomes, 0);
    }

    #[test]
    fn test_duplicate_predictions_keep_last_by_default() {
        let result = match_records(
            &preds(&[("A", 10.0), ("A", 90.0)]),
            &outs(&[("A", "late")]),
        );

        assert_eq!(result.duplicate_predictions, 1);
        assert_eq!(result.pairs[0].prediction.risk_score, Some(90.0));
        assert_eq!(result.unmatched_predictions, 0);
    }

    #[test]
    fn test_duplicate_predictions_keep_first() {
        let matcher = RecordMatcher::new(DuplicateKeyPolicy::KeepFirst);
        let result = matcher.match_records(
            &preds(&[("A", 10.0), ("A", 90.0)]),
            &outs(&[("A", "late")]),
        );

        assert_eq!(result.pairs[0].prediction.risk_score, Some(10.0));
    }

    #[test]
    fn test_duplicate_outcomes_match_once() {
        let result = match_records(
            &preds(&[("A", 80.0)]),
            &outs(&[("A", "on_time"), ("B", "late"), ("A", "late")]),
        );

        assert_eq!(result.matched(), 1);
        assert_eq!(result.pairs[0].outcome.label, "late");
        assert_eq!(result.duplicate_outcomes, 1);
        // "B" has no prediction, the first "A" was superseded
        assert_eq!(result.unmatched_outcomes, 2);
    }

    #[test]
    fn test_superseded_outcome_counts_as_unmatched() {
        let outcomes = outs(&[("A", "late"), ("A", "on_time")]);
        let result = match_records(&preds(&[("A", 80.0)]), &outcomes);

        assert_eq!(result.matched(), 1);
        assert_eq!(result.duplicate_outcomes, 1);
        assert_eq!(result.unmatched_outcomes, 1);
        assert_eq!(result.matched() + result.unmatched_outcomes, outcomes.len());
    }

    #[test]
    fn test_pairs_follow_surviving_outcome_order() {
        let result = match_records(
            &preds(&[("A", 80.0), ("B", 80.0)]),
            &outs(&[("A", "on_time"), ("B", "late"), ("A", "late")]),
        );

        let keys: Vec<_> = result.pairs.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(match_records(&[], &[]), MatchOutcome::default());
    }

    #[test]
    fn test_policy_deserializes_snake_case() {
        let policy: DuplicateKeyPolicy = serde_json::from_str("\"keep_first\"").unwrap();
        assert_eq!(policy, DuplicateKeyPolicy::KeepFirst);
    }
}
