use super::fields::{OUTCOME_KEY, OUTCOME_LABEL, PREDICTION_BAND, PREDICTION_KEY, PREDICTION_SCORE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One forecast for a trackable unit (an epic, usually).
///
/// Deserialization goes through [`From<Value>`] so that every accepted
/// field-name variant is reconciled; a record that is not a JSON object
/// yields an empty key and is later counted as malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct PredictionRecord {
    pub key: String,
    /// Either a 0-1 fraction or a 0-100 percentage.
    pub risk_score: Option<f64>,
    /// Pre-computed severity label; wins over `risk_score` when present.
    pub explicit_band: Option<String>,
}

impl PredictionRecord {
    pub fn new(key: impl Into<String>, risk_score: Option<f64>, explicit_band: Option<&str>) -> Self {
        Self {
            key: key.into(),
            risk_score,
            explicit_band: explicit_band.map(str::to_string),
        }
    }

    pub fn with_score(key: impl Into<String>, score: f64) -> Self {
        Self::new(key, Some(score), None)
    }

    pub fn with_band(key: impl Into<String>, band: &str) -> Self {
        Self::new(key, None, Some(band))
    }

    /// Build a record from a loosely-typed JSON object.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            key: PREDICTION_KEY.text(object).unwrap_or_default(),
            risk_score: PREDICTION_SCORE.number(object),
            explicit_band: PREDICTION_BAND.text(object),
        }
    }
}

impl From<Value> for PredictionRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(object) => Self::from_object(&object),
            _ => Self::new(String::new(), None, None),
        }
    }
}

/// One observed ground-truth result, recorded after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct OutcomeRecord {
    pub key: String,
    pub label: String,
}

impl OutcomeRecord {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            key: OUTCOME_KEY.text(object).unwrap_or_default(),
            label: OUTCOME_LABEL.text(object).unwrap_or_default(),
        }
    }
}

impl From<Value> for OutcomeRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(object) => Self::from_object(&object),
            _ => Self::new(String::new(), String::new()),
        }
    }
}

/// A prediction joined with the outcome recorded under the same key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
    pub key: String,
    pub prediction: PredictionRecord,
    pub outcome: OutcomeRecord,
}
