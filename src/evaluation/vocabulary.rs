use crate::core::normalize::normalize_label;
use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome labels that count as a realized high-risk delivery.
pub const DEFAULT_HIGH_LABELS: &[&str] = &[
    "late",
    "slipped",
    "slipped_badly",
    "off_track",
    "red_zone",
    "high_risk",
];

/// Outcome labels that count as a healthy delivery.
pub const DEFAULT_LOW_LABELS: &[&str] = &["on_time", "healthy", "green", "low_risk"];

/// Binary ground truth derived from a free-text outcome label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    High,
    Low,
    /// In neither vocabulary; excluded from the confusion matrix.
    Unclassified,
}

/// The HIGH and LOW outcome label sets.
///
/// Deserialized entries go through [`LabelVocabulary::new`] and
/// [`LabelVocabulary::validate`], the same as programmatic construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLabelVocabulary")]
pub struct LabelVocabulary {
    high: BTreeSet<String>,
    low: BTreeSet<String>,
}

#[derive(Deserialize)]
struct RawLabelVocabulary {
    #[serde(default)]
    high: Vec<String>,
    #[serde(default)]
    low: Vec<String>,
}

impl TryFrom<RawLabelVocabulary> for LabelVocabulary {
    type Error = Error;

    fn try_from(raw: RawLabelVocabulary) -> Result<Self> {
        let vocabulary = Self::new(raw.high, raw.low);
        vocabulary.validate()?;
        Ok(vocabulary)
    }
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self::new(
            DEFAULT_HIGH_LABELS.iter().copied(),
            DEFAULT_LOW_LABELS.iter().copied(),
        )
    }
}

impl LabelVocabulary {
    /// Build a vocabulary; entries are normalized and blanks dropped.
    pub fn new<H, L>(high: H, low: L) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        Self {
            high: normalized_set(high),
            low: normalized_set(low),
        }
    }

    pub fn high(&self) -> &BTreeSet<String> {
        &self.high
    }

    pub fn low(&self) -> &BTreeSet<String> {
        &self.low
    }

    pub fn extend_high<I: IntoIterator<Item = S>, S: AsRef<str>>(&mut self, labels: I) {
        self.high.extend(normalized_set(labels));
    }

    pub fn extend_low<I: IntoIterator<Item = S>, S: AsRef<str>>(&mut self, labels: I) {
        self.low.extend(normalized_set(labels));
    }

    pub fn classify(&self, label: &str) -> OutcomeClass {
        let normalized = normalize_label(label);
        if self.high.contains(&normalized) {
            OutcomeClass::High
        } else if self.low.contains(&normalized) {
            OutcomeClass::Low
        } else {
            OutcomeClass::Unclassified
        }
    }

    /// A label may not be both HIGH and LOW.
    pub fn validate(&self) -> Result<()> {
        let overlap: Vec<&str> = self
            .high
            .intersection(&self.low)
            .map(String::as_str)
            .collect();
        if overlap.is_empty() {
            Ok(())
        } else {
            Err(Error::configuration(format!(
                "outcome labels listed as both high and low: {}",
                overlap.join(", ")
            )))
        }
    }
}

fn normalized_set<I>(labels: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| normalize_label(label.as_ref()))
        .filter(|label| !label.is_empty())
        .collect()
}
