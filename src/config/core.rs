use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::evaluation::{Evaluator, LabelVocabulary};
use crate::matching::{DuplicateKeyPolicy, RecordMatcher};
use crate::risk::{BandClassifier, BandThresholds};

pub const DEFAULT_MAX_MISSES: usize = 20;

/// Root configuration structure, read from `.deliveryrisk.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DeliveryRiskConfig {
    /// Severity band thresholds (0-100 scale)
    #[serde(default)]
    pub bands: Option<BandThresholds>,

    /// Outcome label vocabularies
    #[serde(default)]
    pub vocabulary: Option<VocabularyConfig>,

    /// Record matching configuration
    #[serde(default)]
    pub matching: Option<MatchingConfig>,

    /// Report rendering configuration
    #[serde(default)]
    pub report: Option<ReportConfig>,
}

/// Replacement label sets. An empty list keeps the built-in set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub low: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MatchingConfig {
    #[serde(default)]
    pub duplicate_policy: DuplicateKeyPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Maximum number of misses listed in rendered reports
    #[serde(default = "default_max_misses")]
    pub max_misses: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_misses: default_max_misses(),
        }
    }
}

fn default_max_misses() -> usize {
    DEFAULT_MAX_MISSES
}

impl DeliveryRiskConfig {
    pub fn thresholds(&self) -> BandThresholds {
        self.bands.unwrap_or_default()
    }

    pub fn vocabulary(&self) -> LabelVocabulary {
        let defaults = LabelVocabulary::default();
        match &self.vocabulary {
            None => defaults,
            Some(config) => {
                let high: Vec<&str> = if config.high.is_empty() {
                    defaults.high().iter().map(String::as_str).collect()
                } else {
                    config.high.iter().map(String::as_str).collect()
                };
                let low: Vec<&str> = if config.low.is_empty() {
                    defaults.low().iter().map(String::as_str).collect()
                } else {
                    config.low.iter().map(String::as_str).collect()
                };
                LabelVocabulary::new(high, low)
            }
        }
    }

    pub fn duplicate_policy(&self) -> DuplicateKeyPolicy {
        self.matching
            .as_ref()
            .map(|m| m.duplicate_policy)
            .unwrap_or_default()
    }

    pub fn max_misses(&self) -> usize {
        self.report
            .as_ref()
            .map(|r| r.max_misses)
            .unwrap_or(DEFAULT_MAX_MISSES)
    }

    pub fn classifier(&self) -> BandClassifier {
        BandClassifier::new(self.thresholds())
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.classifier(), self.vocabulary())
    }

    pub fn matcher(&self) -> RecordMatcher {
        RecordMatcher::new(self.duplicate_policy())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(bands) = &self.bands {
            bands.validate()?;
        }
        self.vocabulary().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::OutcomeClass;

    #[test]
    fn test_defaults() {
        let config = DeliveryRiskConfig::default();
        assert_eq!(config.thresholds(), BandThresholds::CANONICAL);
        assert_eq!(config.vocabulary(), LabelVocabulary::default());
        assert_eq!(config.duplicate_policy(), DuplicateKeyPolicy::KeepLast);
        assert_eq!(config.max_misses(), DEFAULT_MAX_MISSES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_vocabulary_keeps_other_default() {
        let config = DeliveryRiskConfig {
            vocabulary: Some(VocabularyConfig {
                high: vec!["Descoped".into()],
                low: vec![],
            }),
            ..Default::default()
        };
        let vocab = config.vocabulary();
        assert_eq!(vocab.classify("descoped"), OutcomeClass::High);
        assert_eq!(vocab.classify("late"), OutcomeClass::Unclassified);
        assert_eq!(vocab.classify("green"), OutcomeClass::Low);
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        let config = DeliveryRiskConfig {
            bands: Some(BandThresholds {
                at_risk: 80.0,
                red_zone: 60.0,
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
