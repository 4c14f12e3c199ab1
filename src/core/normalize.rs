//! Text normalization shared by the classifier, matcher and evaluator.
//!
//! Keys, outcome labels and explicit band tokens each have their own
//! normalization rule:
//! - Keys are trimmed but stay case-sensitive (issue codes are case-stable).
//! - Outcome labels are trimmed and lower-cased.
//! - Band tokens are lower-cased with spaces and hyphens folded to `_`,
//!   so `"Off-Track"` and `"off track"` both read as `off_track`.

/// Normalize a business key for matching.
///
/// Returns `None` when the key is empty after trimming.
pub fn normalize_key(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Normalize a free-text outcome label: trimmed, lower-case.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize an explicit band token for synonym lookup.
///
/// Returns `None` for empty or whitespace-only input.
pub fn normalize_band_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let token = trimmed
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_trims_but_keeps_case() {
        assert_eq!(normalize_key("  PROJ-12 "), Some("PROJ-12"));
        assert_eq!(normalize_key("proj-12"), Some("proj-12"));
    }

    #[test]
    fn test_normalize_key_rejects_blank() {
        assert_eq!(normalize_key(""), None);
        assert_eq!(normalize_key(" \t\n"), None);
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Slipped_Badly\n"), "slipped_badly");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_normalize_band_token_folds_separators() {
        assert_eq!(normalize_band_token("Off-Track").as_deref(), Some("off_track"));
        assert_eq!(normalize_band_token(" red  zone ").as_deref(), Some("red_zone"));
        assert_eq!(normalize_band_token("AT_RISK").as_deref(), Some("at_risk"));
        assert_eq!(normalize_band_token("   "), None);
    }
}
