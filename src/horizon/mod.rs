//! Time-horizon bucketing for delivery windows.
//!
//! Upstream window labels are free text ("0-2 weeks", "Past due",
//! "6+ wks", "Completed"). They are matched case-insensitively against a
//! fixed marker list, first match wins. The list order matters: a label such
//! as "2-4 (was 0-2)" must land in the bucket whose marker is checked first.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HorizonBucket {
    #[serde(rename = "past_due")]
    PastDue,
    #[serde(rename = "0_2")]
    ZeroToTwo,
    #[serde(rename = "2_4")]
    TwoToFour,
    #[serde(rename = "4_6")]
    FourToSix,
    #[serde(rename = "6_plus")]
    SixPlus,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "unknown")]
    Unknown,
}

/// Markers in priority order. Both ASCII hyphen and en dash are accepted.
const HORIZON_MARKERS: &[(&[&str], HorizonBucket)] = &[
    (&["past"], HorizonBucket::PastDue),
    (&["0-2", "0\u{2013}2"], HorizonBucket::ZeroToTwo),
    (&["2-4", "2\u{2013}4"], HorizonBucket::TwoToFour),
    (&["4-6", "4\u{2013}6"], HorizonBucket::FourToSix),
    (&["6+"], HorizonBucket::SixPlus),
    (&["completed"], HorizonBucket::Completed),
];

impl HorizonBucket {
    /// All buckets in temporal order.
    pub const ALL: [HorizonBucket; 7] = [
        HorizonBucket::PastDue,
        HorizonBucket::ZeroToTwo,
        HorizonBucket::TwoToFour,
        HorizonBucket::FourToSix,
        HorizonBucket::SixPlus,
        HorizonBucket::Completed,
        HorizonBucket::Unknown,
    ];

    fn index(&self) -> usize {
        *self as usize
    }

    /// Still in flight: neither completed nor unbucketable.
    pub fn is_open(&self) -> bool {
        !matches!(self, HorizonBucket::Completed | HorizonBucket::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HorizonBucket::PastDue => "past_due",
            HorizonBucket::ZeroToTwo => "0_2",
            HorizonBucket::TwoToFour => "2_4",
            HorizonBucket::FourToSix => "4_6",
            HorizonBucket::SixPlus => "6_plus",
            HorizonBucket::Completed => "completed",
            HorizonBucket::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HorizonBucket::PastDue => "Past due",
            HorizonBucket::ZeroToTwo => "0-2 weeks",
            HorizonBucket::TwoToFour => "2-4 weeks",
            HorizonBucket::FourToSix => "4-6 weeks",
            HorizonBucket::SixPlus => "6+ weeks",
            HorizonBucket::Completed => "Completed",
            HorizonBucket::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for HorizonBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a free-text delivery window. Total: never fails.
pub fn bucket(label: Option<&str>) -> HorizonBucket {
    let Some(label) = label else {
        return HorizonBucket::Unknown;
    };
    let lowered = label.to_lowercase();

    HORIZON_MARKERS
        .iter()
        .find(|(markers, _)| markers.iter().any(|m| lowered.contains(m)))
        .map(|(_, bucket)| *bucket)
        .unwrap_or(HorizonBucket::Unknown)
}

/// Per-bucket counts, kept in temporal order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonDistribution {
    counts: [usize; 7],
}

impl HorizonDistribution {
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        labels.into_iter().map(bucket).fold(Self::default(), |mut acc, b| {
            acc.add(b);
            acc
        })
    }

    pub fn add(&mut self, bucket: HorizonBucket) {
        self.counts[bucket.index()] += 1;
    }

    pub fn count(&self, bucket: HorizonBucket) -> usize {
        self.counts[bucket.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Items still in flight (see [`HorizonBucket::is_open`]).
    pub fn open(&self) -> usize {
        HorizonBucket::ALL
            .iter()
            .filter(|b| b.is_open())
            .map(|b| self.count(*b))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HorizonBucket, usize)> + '_ {
        HorizonBucket::ALL.iter().map(|b| (*b, self.count(*b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_markers() {
        assert_eq!(bucket(Some("Past due")), HorizonBucket::PastDue);
        assert_eq!(bucket(Some("0-2 weeks")), HorizonBucket::ZeroToTwo);
        assert_eq!(bucket(Some("2\u{2013}4 wks")), HorizonBucket::TwoToFour);
        assert_eq!(bucket(Some("4-6")), HorizonBucket::FourToSix);
        assert_eq!(bucket(Some("6+ weeks")), HorizonBucket::SixPlus);
        assert_eq!(bucket(Some("COMPLETED")), HorizonBucket::Completed);
    }

    #[test]
    fn test_bucket_unknown_inputs() {
        assert_eq!(bucket(None), HorizonBucket::Unknown);
        assert_eq!(bucket(Some("")), HorizonBucket::Unknown);
        assert_eq!(bucket(Some("next quarter")), HorizonBucket::Unknown);
    }

    #[test]
    fn test_first_marker_wins() {
        assert_eq!(bucket(Some("2-4 (was 0-2)")), HorizonBucket::ZeroToTwo);
        assert_eq!(bucket(Some("past 6+ target")), HorizonBucket::PastDue);
        assert_eq!(bucket(Some("completed 4-6 weeks late")), HorizonBucket::FourToSix);
    }

    #[test]
    fn test_bucket_ordering_is_temporal() {
        let mut sorted = HorizonBucket::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, HorizonBucket::ALL.to_vec());
        assert!(HorizonBucket::PastDue < HorizonBucket::SixPlus);
    }

    #[test]
    fn test_is_open() {
        assert!(HorizonBucket::PastDue.is_open());
        assert!(HorizonBucket::SixPlus.is_open());
        assert!(!HorizonBucket::Completed.is_open());
        assert!(!HorizonBucket::Unknown.is_open());
    }

    #[test]
    fn test_distribution() {
        let dist = HorizonDistribution::from_labels([
            Some("0-2 weeks"),
            Some("0–2"),
            Some("completed"),
            None,
        ]);
        assert_eq!(dist.count(HorizonBucket::ZeroToTwo), 2);
        assert_eq!(dist.count(HorizonBucket::Completed), 1);
        assert_eq!(dist.count(HorizonBucket::Unknown), 1);
        assert_eq!(dist.total(), 4);
        assert_eq!(dist.open(), 2);
        assert_eq!(dist.iter().count(), 7);
    }
}
