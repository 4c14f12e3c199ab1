//! Severity banding for risk predictions.
//!
//! A prediction carries either an explicit band label or a numeric risk
//! score. [`BandClassifier`] turns either into a [`SeverityBand`]; the
//! evaluator's notion of "high risk" is [`SeverityBand::is_high`] applied to
//! that result and is not computed anywhere else.

pub mod distribution;

pub use distribution::BandDistribution;

use crate::core::normalize::normalize_band_token;
use crate::core::{Error, PredictionRecord, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Healthy,
    AtRisk,
    RedZone,
    /// No score and no explicit band could be read.
    Unknown,
}

/// Explicit band tokens (after [`normalize_band_token`]) and the band each maps to.
pub const BAND_SYNONYMS: &[(&str, SeverityBand)] = &[
    ("healthy", SeverityBand::Healthy),
    ("green", SeverityBand::Healthy),
    ("low", SeverityBand::Healthy),
    ("low_risk", SeverityBand::Healthy),
    ("on_track", SeverityBand::Healthy),
    ("on_time", SeverityBand::Healthy),
    ("at_risk", SeverityBand::AtRisk),
    ("amber", SeverityBand::AtRisk),
    ("yellow", SeverityBand::AtRisk),
    ("medium", SeverityBand::AtRisk),
    ("medium_risk", SeverityBand::AtRisk),
    ("moderate", SeverityBand::AtRisk),
    ("watch", SeverityBand::AtRisk),
    ("red_zone", SeverityBand::RedZone),
    ("red", SeverityBand::RedZone),
    ("high", SeverityBand::RedZone),
    ("high_risk", SeverityBand::RedZone),
    ("critical", SeverityBand::RedZone),
    ("off_track", SeverityBand::RedZone),
    ("unknown", SeverityBand::Unknown),
];

impl SeverityBand {
    pub const ALL: [SeverityBand; 4] = [
        SeverityBand::Healthy,
        SeverityBand::AtRisk,
        SeverityBand::RedZone,
        SeverityBand::Unknown,
    ];

    /// Map an explicit band label onto the enum, accepting synonyms.
    pub fn from_token(raw: &str) -> Option<Self> {
        let token = normalize_band_token(raw)?;
        BAND_SYNONYMS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, band)| *band)
    }

    /// Position in the severity ordering; `None` for `Unknown`.
    pub fn rank(&self) -> Option<u8> {
        match self {
            SeverityBand::Healthy => Some(0),
            SeverityBand::AtRisk => Some(1),
            SeverityBand::RedZone => Some(2),
            SeverityBand::Unknown => None,
        }
    }

    /// At risk or red zone.
    pub fn is_high(&self) -> bool {
        matches!(self, SeverityBand::AtRisk | SeverityBand::RedZone)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::Healthy => "healthy",
            SeverityBand::AtRisk => "at_risk",
            SeverityBand::RedZone => "red_zone",
            SeverityBand::Unknown => "unknown",
        }
    }

    /// Human-facing label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityBand::Healthy => "Healthy",
            SeverityBand::AtRisk => "At Risk",
            SeverityBand::RedZone => "Red Zone",
            SeverityBand::Unknown => "Unknown",
        }
    }
}

impl PartialOrd for SeverityBand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ if self == other => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds (inclusive, 0-100 scale) of the at-risk and red-zone bands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    #[serde(default = "default_at_risk")]
    pub at_risk: f64,
    #[serde(default = "default_red_zone")]
    pub red_zone: f64,
}

pub const DEFAULT_AT_RISK_THRESHOLD: f64 = 50.0;
pub const DEFAULT_RED_ZONE_THRESHOLD: f64 = 70.0;

/// Precision kept when scaling fractions to percentages.
const FRACTION_SCALE: f64 = 1e9;

fn default_at_risk() -> f64 {
    DEFAULT_AT_RISK_THRESHOLD
}
fn default_red_zone() -> f64 {
    DEFAULT_RED_ZONE_THRESHOLD
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl BandThresholds {
    pub const CANONICAL: BandThresholds = BandThresholds {
        at_risk: DEFAULT_AT_RISK_THRESHOLD,
        red_zone: DEFAULT_RED_ZONE_THRESHOLD,
    };

    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if !in_range(self.at_risk) || !in_range(self.red_zone) {
            return Err(Error::configuration(format!(
                "band thresholds must lie within 0-100 (at_risk={}, red_zone={})",
                self.at_risk, self.red_zone
            )));
        }
        if self.at_risk >= self.red_zone {
            return Err(Error::configuration(format!(
                "at_risk threshold ({}) must be below red_zone threshold ({})",
                self.at_risk, self.red_zone
            )));
        }
        Ok(())
    }
}

/// Bring a raw score onto the 0-100 scale.
///
/// Values at or below 1 are read as fractions. Non-finite input has no
/// meaningful score and yields `None`.
pub fn normalize_score(score: f64) -> Option<f64> {
    if !score.is_finite() {
        return None;
    }
    if score <= 1.0 {
        // 0.57 * 100.0 is 56.99999999999999 in binary floating point
        Some((score * 100.0 * FRACTION_SCALE).round() / FRACTION_SCALE)
    } else {
        Some(score)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandClassifier {
    thresholds: BandThresholds,
}

impl BandClassifier {
    pub fn new(thresholds: BandThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> BandThresholds {
        self.thresholds
    }

    /// Classify a score and/or explicit band.
    ///
    /// A non-blank explicit band always wins, even when it is not a known
    /// synonym (it then yields `Unknown`).
    pub fn classify(&self, score: Option<f64>, explicit_band: Option<&str>) -> SeverityBand {
        if let Some(band) = explicit_band.filter(|b| !b.trim().is_empty()) {
            return SeverityBand::from_token(band).unwrap_or(SeverityBand::Unknown);
        }
        score
            .map(|s| self.classify_score(s))
            .unwrap_or(SeverityBand::Unknown)
    }

    pub fn classify_score(&self, score: f64) -> SeverityBand {
        match normalize_score(score) {
            Some(s) if s >= self.thresholds.red_zone => SeverityBand::RedZone,
            Some(s) if s >= self.thresholds.at_risk => SeverityBand::AtRisk,
            Some(_) => SeverityBand::Healthy,
            None => SeverityBand::Unknown,
        }
    }

    pub fn classify_record(&self, record: &PredictionRecord) -> SeverityBand {
        self.classify(record.risk_score, record.explicit_band.as_deref())
    }

    pub fn is_high_risk(&self, record: &PredictionRecord) -> bool {
        self.classify_record(record).is_high()
    }
}

/// Classify with the canonical 50/70 thresholds.
pub fn classify(score: Option<f64>, explicit_band: Option<&str>) -> SeverityBand {
    BandClassifier::default().classify(score, explicit_band)
}

/// High-risk predicate with the canonical thresholds.
pub fn is_high_risk(record: &PredictionRecord) -> bool {
    BandClassifier::default().is_high_risk(record)
}
