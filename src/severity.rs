// src/severity.rs
//! Per-symptom severity weights and the mild/severe input categories.
//!
//! The weight table is static, process-wide, and read-only: it reflects the
//! diagnostic significance calibrated together with the trained model, not a
//! per-request tunable. Keys are lowercased, space-separated symptom names;
//! anything absent weighs 1.0.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static WEIGHTS: Lazy<HashMap<String, f32>> = Lazy::new(|| {
    let raw = include_str!("../severity_weights.json");
    serde_json::from_str::<HashMap<String, f32>>(raw).expect("valid severity weight table")
});

/// Severity weight for a (lowercased) symptom; 1.0 when unknown.
#[inline]
pub fn weight_for(symptom: &str) -> f32 {
    *WEIGHTS.get(symptom).unwrap_or(&1.0)
}

/// Symptoms that mark an input as "everyday mild" when no severe one is present.
pub const MILD_SYMPTOMS: [&str; 4] = ["cough", "runny nose", "sneezing", "sore throat"];

/// Red-flag symptoms; any one of these puts the whole input in the severe bucket.
pub const SEVERE_SYMPTOMS: [&str; 4] = [
    "high fever",
    "chest pain",
    "shortness of breath",
    "bloody sputum",
];

/// Coarse category of a whole symptom list, used by the score blender.
/// Membership is exact (the extractor already canonicalizes tokens).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymptomCategory {
    /// At least one mild symptom and no severe one.
    MildOnly,
    /// At least one severe symptom, regardless of what else is present.
    Severe,
    /// Neither set is represented; no multiplier applies.
    Unclassified,
}

pub fn classify(symptoms: &[String]) -> SymptomCategory {
    let has_severe = symptoms.iter().any(|s| SEVERE_SYMPTOMS.contains(&s.as_str()));
    if has_severe {
        return SymptomCategory::Severe;
    }
    let has_mild = symptoms.iter().any(|s| MILD_SYMPTOMS.contains(&s.as_str()));
    if has_mild {
        SymptomCategory::MildOnly
    } else {
        SymptomCategory::Unclassified
    }
}
