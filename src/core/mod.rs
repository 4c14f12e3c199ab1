pub mod errors;
pub mod fields;
pub mod normalize;
pub mod records;

pub use errors::{Error, Result, ResultExt};
pub use fields::FieldLookup;
pub use normalize::{normalize_band_token, normalize_key, normalize_label};
pub use records::{MatchedPair, OutcomeRecord, PredictionRecord};
