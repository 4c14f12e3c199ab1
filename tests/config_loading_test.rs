/// Integration tests for `.deliveryrisk.toml` discovery
use anyhow::Result;
use deliveryrisk::config::{load_config_from, load_config_from_path, CONFIG_FILE_NAME};
use deliveryrisk::{BandThresholds, DeliveryRiskConfig, DuplicateKeyPolicy, OutcomeClass};
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

const CUSTOM_CONFIG: &str = indoc! {r#"
    [bands]
    at_risk = 45.0
    red_zone = 75.0

    [vocabulary]
    low = ["on_time", "shipped"]

    [matching]
    duplicate_policy = "keep_first"
"#};

#[test]
fn test_config_found_in_ancestor_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join(CONFIG_FILE_NAME), CUSTOM_CONFIG)?;
    let nested = temp_dir.path().join("reports").join("weekly");
    fs::create_dir_all(&nested)?;

    let config = load_config_from(nested);

    assert_eq!(config.thresholds().at_risk, 45.0);
    assert_eq!(config.thresholds().red_zone, 75.0);
    assert_eq!(config.duplicate_policy(), DuplicateKeyPolicy::KeepFirst);
    assert_eq!(config.vocabulary().classify("shipped"), OutcomeClass::Low);
    assert_eq!(config.vocabulary().classify("green"), OutcomeClass::Unclassified);
    Ok(())
}

#[test]
fn test_missing_config_uses_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config_from(temp_dir.path().to_path_buf());

    // An ancestor of the temp dir could carry its own config; thresholds stay valid either way
    assert!(config.thresholds().validate().is_ok());
    Ok(())
}

#[test]
fn test_invalid_config_falls_back_to_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "[vocabulary]\nhigh = [\"late\"]\nlow = [\"late\"]\n",
    )?;

    let config = load_config_from(temp_dir.path().to_path_buf());
    assert_ne!(config.vocabulary().classify("late"), OutcomeClass::Low);
    Ok(())
}

#[test]
fn test_explicit_path_reports_errors() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("absent.toml");
    let err = load_config_from_path(&missing).unwrap_err();
    assert!(err.is_user_fixable());

    let path = temp_dir.path().join("custom.toml");
    fs::write(&path, CUSTOM_CONFIG)?;
    let config = load_config_from_path(&path)?;
    assert_ne!(config, DeliveryRiskConfig::default());
    assert_ne!(config.thresholds(), BandThresholds::CANONICAL);
    Ok(())
}
