use super::{BandClassifier, SeverityBand};
use crate::core::PredictionRecord;
use serde::{Deserialize, Serialize};

/// Per-band counts over a set of predictions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandDistribution {
    pub healthy: usize,
    pub at_risk: usize,
    pub red_zone: usize,
    pub unknown: usize,
    pub total: usize,
}

impl BandDistribution {
    pub fn from_records<'a>(
        classifier: &BandClassifier,
        records: impl IntoIterator<Item = &'a PredictionRecord>,
    ) -> Self {
        records
            .into_iter()
            .map(|record| classifier.classify_record(record))
            .fold(Self::default(), |mut acc, band| {
                acc.add(band);
                acc
            })
    }

    pub fn add(&mut self, band: SeverityBand) {
        match band {
            SeverityBand::Healthy => self.healthy += 1,
            SeverityBand::AtRisk => self.at_risk += 1,
            SeverityBand::RedZone => self.red_zone += 1,
            SeverityBand::Unknown => self.unknown += 1,
        }
        self.total += 1;
    }

    pub fn count(&self, band: SeverityBand) -> usize {
        match band {
            SeverityBand::Healthy => self.healthy,
            SeverityBand::AtRisk => self.at_risk,
            SeverityBand::RedZone => self.red_zone,
            SeverityBand::Unknown => self.unknown,
        }
    }

    pub fn high_risk_count(&self) -> usize {
        self.at_risk + self.red_zone
    }

    /// Fraction of records that are high risk; 0 when empty.
    pub fn high_risk_share(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.high_risk_count() as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_counts_each_band() {
        let records = vec![
            PredictionRecord::with_score("A", 0.9),
            PredictionRecord::with_score("B", 55.0),
            PredictionRecord::with_score("C", 10.0),
            PredictionRecord::with_band("D", "red"),
            PredictionRecord::new("E", None, None),
        ];
        let dist = BandDistribution::from_records(&BandClassifier::default(), &records);

        assert_eq!(dist.healthy, 1);
        assert_eq!(dist.at_risk, 1);
        assert_eq!(dist.red_zone, 2);
        assert_eq!(dist.unknown, 1);
        assert_eq!(dist.total, 5);
        assert_eq!(dist.high_risk_count(), 3);
        assert!((dist.high_risk_share() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_empty_distribution() {
        let dist = BandDistribution::from_records(&BandClassifier::default(), std::iter::empty());
        assert_eq!(dist, BandDistribution::default());
        assert_eq!(dist.high_risk_share(), 0.0);
    }
}
