// src/config.rs
//! Startup configuration: asset locations and engine tuning constants.
//!
//! Everything here is resolved once at boot and frozen into the engine
//! snapshot. Tuning values come from `config/tuning.toml` when present,
//! with environment overrides for the similarity threshold; thresholds are
//! never tunable per request.

use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::similarity::DEFAULT_MATCH_THRESHOLD;

// --- env defaults & names ---
pub const DEFAULT_ASSET_DIR: &str = "assets";
pub const DEFAULT_TUNING_PATH: &str = "config/tuning.toml";

pub const ENV_ASSET_DIR: &str = "TRIAGE_ASSET_DIR";
pub const ENV_TUNING_PATH: &str = "TRIAGE_TUNING_PATH";
pub const ENV_MATCH_THRESHOLD: &str = "TRIAGE_MATCH_THRESHOLD";
pub const ENV_DEV_LOG: &str = "TRIAGE_DEV_LOG";

/// Calibrated constants of the ranking pipeline.
///
/// TOML shape (all keys optional):
/// ```toml
/// similarity_threshold = 0.8
/// model_weight = 0.6
/// overlap_weight = 0.4
/// miss_penalty = 0.1
/// prob_floor = 0.05
/// prob_ceiling = 0.85
/// top_n = 5
/// ```
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fuzzy-match cutoff shared by the encoder and the overlap scorer.
    pub similarity_threshold: f32,
    /// Blend weight of the classifier probability.
    pub model_weight: f32,
    /// Blend weight of the symptom-overlap ratio.
    pub overlap_weight: f32,
    /// Overlap penalty per unmatched input symptom.
    pub miss_penalty: f32,
    /// Classifier probabilities are clamped into [floor, ceiling] before
    /// renormalization so no single class saturates the distribution.
    pub prob_floor: f32,
    pub prob_ceiling: f32,
    /// Ranked results kept per request.
    pub top_n: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_MATCH_THRESHOLD,
            model_weight: 0.6,
            overlap_weight: 0.4,
            miss_penalty: 0.1,
            prob_floor: 0.05,
            prob_ceiling: 0.85,
            top_n: 5,
        }
    }
}

impl Tuning {
    /// Parse from a TOML string and sanitize.
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let mut t: Tuning = toml::from_str(raw)?;
        t.sanitize();
        Ok(t)
    }

    /// Clamp out-of-range values back to something servable.
    fn sanitize(&mut self) {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            self.similarity_threshold = DEFAULT_MATCH_THRESHOLD;
        }
        self.miss_penalty = self.miss_penalty.clamp(0.0, 1.0);
        self.prob_floor = self.prob_floor.clamp(0.0, 1.0);
        self.prob_ceiling = self.prob_ceiling.clamp(0.0, 1.0);
        if self.prob_floor > self.prob_ceiling {
            std::mem::swap(&mut self.prob_floor, &mut self.prob_ceiling);
        }
        if self.top_n == 0 {
            self.top_n = Tuning::default().top_n;
        }
    }
}

/// Resolved startup configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding `vocabulary.json`, `model.json`, `labels.json`,
    /// `diseases.json` — all from one training/preparation run.
    pub asset_dir: PathBuf,
    pub tuning: Tuning,
}

impl EngineConfig {
    /// Resolve from the environment. A missing tuning file means defaults;
    /// a present-but-invalid one is a configuration error.
    pub fn from_env() -> anyhow::Result<Self> {
        let asset_dir = std::env::var(ENV_ASSET_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ASSET_DIR));

        let tuning_path = std::env::var(ENV_TUNING_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TUNING_PATH));

        let mut tuning = match fs::read_to_string(&tuning_path) {
            Ok(raw) => Tuning::from_toml_str(&raw).map_err(|e| {
                anyhow::anyhow!("invalid tuning file {}: {}", tuning_path.display(), e)
            })?,
            Err(_) => Tuning::default(),
        };

        if let Some(t) = parse_threshold_env(std::env::var(ENV_MATCH_THRESHOLD).ok()) {
            tuning.similarity_threshold = t;
        }

        Ok(Self { asset_dir, tuning })
    }
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_threshold_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .map(|v| v.clamp(0.0, 1.0))
}

/// Dev logging gate: TRIAGE_DEV_LOG=1 AND a debug build.
/// Production builds never log symptom-derived data, even hashed.
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    on && cfg!(debug_assertions)
}
