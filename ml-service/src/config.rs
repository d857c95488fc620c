//! Configuration module

use std::env;
use std::path::PathBuf;

use aquaguard_core::constants::{
    DEFAULT_CONTAMINATION, DEFAULT_MODEL_PATH, DEFAULT_NUM_TREES, DEFAULT_SEED,
    DEFAULT_SUBSAMPLE_SIZE,
};
use aquaguard_core::DetectorConfig;

/// Default listening port
pub const DEFAULT_PORT: u16 = 5000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Detector parameters and model artifact path
    pub detector: DetectorConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),

            detector: DetectorConfig {
                model_path: env::var("MODEL_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH)),

                num_trees: env::var("NUM_TREES")
                    .ok()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(DEFAULT_NUM_TREES),

                subsample_size: env::var("SUBSAMPLE_SIZE")
                    .ok()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(DEFAULT_SUBSAMPLE_SIZE),

                contamination: env::var("CONTAMINATION")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(DEFAULT_CONTAMINATION),

                seed: env::var("RANDOM_SEED")
                    .map(|s| parse_seed(&s))
                    .unwrap_or(Some(DEFAULT_SEED)),

                bootstrap: env::var("BOOTSTRAP_MODEL")
                    .map(|b| parse_flag(&b, true))
                    .unwrap_or(true),
            },
        }
    }
}

/// `none` (or empty) means seed from OS entropy; garbage falls back to the default
fn parse_seed(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return None;
    }
    Some(raw.parse().unwrap_or(DEFAULT_SEED))
}

fn parse_flag(raw: &str, default: bool) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
