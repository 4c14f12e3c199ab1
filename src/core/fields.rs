//! Ordered field lookup for loosely-typed records.
//!
//! Upstream producers disagree on field names (`key` vs `epicKey` vs
//! `epic_key`, and so on). Each logical field is described by a
//! [`FieldLookup`]: an ordered list of candidate names. The first candidate
//! holding a non-empty value wins.

use serde_json::{Map, Value};

/// Ordered list of candidate field names for one logical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLookup {
    candidates: &'static [&'static str],
}

/// Business key of a prediction.
pub const PREDICTION_KEY: FieldLookup = FieldLookup::new(&["key", "epicKey", "epic_key"]);

/// Explicit severity band of a prediction. `explicitBand` is the name
/// [`PredictionRecord`](super::PredictionRecord) serializes under.
pub const PREDICTION_BAND: FieldLookup = FieldLookup::new(&[
    "riskLevel",
    "band",
    "predictedBand",
    "predictionBand",
    "explicitBand",
]);

/// Numeric risk score of a prediction.
pub const PREDICTION_SCORE: FieldLookup = FieldLookup::new(&["probability", "riskScore"]);

/// Business key of an outcome.
pub const OUTCOME_KEY: FieldLookup = FieldLookup::new(&["key", "epicKey", "epic_key"]);

/// Free-text label of an outcome.
pub const OUTCOME_LABEL: FieldLookup =
    FieldLookup::new(&["actualBand", "actual_band", "actual", "outcome", "label"]);

impl FieldLookup {
    pub const fn new(candidates: &'static [&'static str]) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &'static [&'static str] {
        self.candidates
    }

    /// First candidate holding a non-blank string, or a number rendered as text.
    pub fn text(&self, object: &Map<String, Value>) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|name| object.get(*name))
            .find_map(value_as_text)
    }

    /// First candidate holding a number, or a string that parses as one.
    pub fn number(&self, object: &Map<String, Value>) -> Option<f64> {
        self.candidates
            .iter()
            .filter_map(|name| object.get(*name))
            .find_map(value_as_number)
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_as_text(n)),
        _ => None,
    }
}

/// Integral floats render without a fraction so `42.0` and `42` key alike.
fn number_as_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_text_prefers_earlier_candidate() {
        let obj = object(json!({ "epic_key": "B-2", "key": "A-1" }));
        assert_eq!(PREDICTION_KEY.text(&obj).as_deref(), Some("A-1"));
    }

    #[test]
    fn test_text_skips_blank_and_null_values() {
        let obj = object(json!({ "key": "  ", "epicKey": null, "epic_key": "C-3" }));
        assert_eq!(PREDICTION_KEY.text(&obj).as_deref(), Some("C-3"));
    }

    #[test]
    fn test_text_renders_numbers() {
        let obj = object(json!({ "key": 42 }));
        assert_eq!(OUTCOME_KEY.text(&obj).as_deref(), Some("42"));
    }

    #[test]
    fn test_text_renders_integral_floats_as_integers() {
        let obj = object(json!({ "key": 42.0 }));
        assert_eq!(OUTCOME_KEY.text(&obj).as_deref(), Some("42"));

        let obj = object(json!({ "key": 42.5 }));
        assert_eq!(OUTCOME_KEY.text(&obj).as_deref(), Some("42.5"));
    }

    #[test]
    fn test_serialized_names_are_candidates() {
        let obj = object(json!({ "riskScore": 80.0, "explicitBand": "red" }));
        assert_eq!(PREDICTION_SCORE.number(&obj), Some(80.0));
        assert_eq!(PREDICTION_BAND.text(&obj).as_deref(), Some("red"));
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        let obj = object(json!({ "probability": " 0.65 " }));
        assert_eq!(PREDICTION_SCORE.number(&obj), Some(0.65));
    }

    #[test]
    fn test_number_ignores_garbage() {
        let obj = object(json!({ "probability": "n/a" }));
        assert_eq!(PREDICTION_SCORE.number(&obj), None);
    }

    #[test]
    fn test_outcome_label_order() {
        let obj = object(json!({ "label": "green", "outcome": "late" }));
        assert_eq!(OUTCOME_LABEL.text(&obj).as_deref(), Some("late"));
    }
}
