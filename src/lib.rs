// Export modules for library usage
pub mod config;
pub mod core;
pub mod evaluation;
pub mod horizon;
pub mod io;
pub mod matching;
pub mod report;
pub mod risk;

// Re-export commonly used types
pub use crate::core::{Error, MatchedPair, OutcomeRecord, PredictionRecord, Result};

pub use crate::risk::{
    classify, is_high_risk, BandClassifier, BandDistribution, BandThresholds, SeverityBand,
};

pub use crate::horizon::{bucket, HorizonBucket, HorizonDistribution};

pub use crate::matching::{match_records, DuplicateKeyPolicy, MatchOutcome, RecordMatcher};

pub use crate::evaluation::{
    evaluate, EvaluationResult, Evaluator, LabelVocabulary, MissKind, MissRecord, OutcomeClass,
};

pub use crate::config::{load_config, parse_and_validate_config, DeliveryRiskConfig};

pub use crate::report::{evaluate_records, EvaluationReport, MatchSummary};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
