use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::DeliveryRiskConfig;
use crate::core::{Error, Result};
use crate::risk::BandThresholds;

pub const CONFIG_FILE_NAME: &str = ".deliveryrisk.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string.
///
/// Invalid band thresholds are replaced by the canonical pair with a
/// warning; overlapping vocabularies are an error.
pub fn parse_and_validate_config(contents: &str) -> Result<DeliveryRiskConfig> {
    let mut config = toml::from_str::<DeliveryRiskConfig>(contents)?;

    if let Some(bands) = config.bands {
        if let Err(e) = bands.validate() {
            log::warn!("Invalid band thresholds: {}. Using defaults.", e);
            config.bands = Some(BandThresholds::CANONICAL);
        }
    }

    config.vocabulary().validate()?;
    Ok(config)
}

/// Load and validate a config file at an explicit path
pub fn load_config_from_path(path: &Path) -> Result<DeliveryRiskConfig> {
    let contents = read_config_file(path)
        .map_err(|e| Error::config_file(path, "failed to read config file", Some(e)))?;
    parse_and_validate_config(&contents)
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<DeliveryRiskConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} in {}. Using defaults.", e, config_path.display());
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for the config file.
pub fn load_config_from(start: PathBuf) -> DeliveryRiskConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            DeliveryRiskConfig::default()
        })
}

pub fn load_config() -> DeliveryRiskConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            DeliveryRiskConfig::default()
        }
    }
}
