// src/prediction.rs
//! Output value types: ranked results, confidence tiers, and the error sentinel.
//!
//! This is the shape the API returns to the presentation collaborator. A
//! response is always a non-empty sequence: either ranked `PredictionResult`s
//! or a single `{"error": "..."}` sentinel, so the renderer never has to
//! special-case an empty list.

use serde::{Deserialize, Serialize};

/// The presentation layer shows at most this many precautions per disease.
/// The assembler still returns the full list; truncation is the renderer's job.
pub const PRECAUTIONS_DISPLAY_CAP: usize = 4;

/// Coarse confidence tier derived from the final normalized score.
/// Thresholds are a fixed contract with the UI, not tunable at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Moderate,
    Low,
}

impl Confidence {
    /// Tier for a percentage score in [0, 100].
    pub fn from_score(score: f32) -> Self {
        if score >= 75.0 {
            Confidence::High
        } else if score >= 45.0 {
            Confidence::Moderate
        } else {
            Confidence::Low
        }
    }

    /// Display color the UI binds to this tier (documented contract).
    pub fn color(&self) -> &'static str {
        match self {
            Confidence::High => "#28a745",
            Confidence::Moderate => "#ffc107",
            Confidence::Low => "#dc3545",
        }
    }
}

/// One ranked disease candidate with everything the renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub disease: String,
    /// Percentage in [0, 100], one decimal.
    pub score: f32,
    pub confidence: Confidence,
    pub description: String,
    /// Full precautions list; see [`PRECAUTIONS_DISPLAY_CAP`].
    pub precautions: Vec<String>,
    /// Input symptoms that fuzzily matched this disease's known set.
    pub matched_symptoms: Vec<String>,
}

/// Sentinel carried instead of results when nothing can be ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

/// A response element: a ranked result or the error sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    Ranked(PredictionResult),
    Error(ErrorResult),
}

impl Prediction {
    pub fn error(message: impl Into<String>) -> Self {
        Prediction::Error(ErrorResult {
            error: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Prediction::Error(_))
    }

    pub fn as_ranked(&self) -> Option<&PredictionResult> {
        match self {
            Prediction::Ranked(r) => Some(r),
            Prediction::Error(_) => None,
        }
    }
}

/// Intermediate candidate produced by blending, consumed by assembly.
/// Never serialized; lives only for the duration of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub disease: String,
    pub model_prob: f32,
    /// Fuzzy coverage of the input against this disease's symptom set, [0, 1].
    pub overlap_ratio: f32,
    pub matched_symptoms: Vec<String>,
    pub final_score: f32,
}
