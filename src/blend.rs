// src/blend.rs
//! Score Blender: combine model probability with symptom overlap, apply the
//! mild/severe category multipliers, normalize, rank, truncate.
//!
//! Multipliers key on the caller's whole symptom list:
//!   - mild-only input: ×1.3 for cold/allergy-family disease names,
//!     ×0.7 for everything else;
//!   - severe input: ×1.3 for the severe respiratory trio, ×1.0 otherwise;
//!   - unclassified input: untouched.
//! After adjustment every score is divided by the request's maximum (unless
//! the maximum is ≤ 0, where comparisons are degenerate anyway).

use std::cmp::Ordering;

use crate::config::Tuning;
use crate::prediction::ScoredCandidate;
use crate::severity::SymptomCategory;

const MILD_BOOST: f32 = 1.3;
const MILD_PENALTY: f32 = 0.7;
const SEVERE_BOOST: f32 = 1.3;

/// Disease-name fragments boosted under a mild-only input.
const MILD_BOOST_NAMES: [&str; 3] = ["common cold", "seasonal allergy", "rhinitis"];

/// Disease-name fragments boosted under a severe input.
const SEVERE_BOOST_NAMES: [&str; 3] = ["pneumonia", "covid", "tuberculosis"];

/// Linear blend of the two per-disease signals.
#[inline]
pub fn blend_score(model_prob: f32, overlap_ratio: f32, tuning: &Tuning) -> f32 {
    tuning.model_weight * model_prob + tuning.overlap_weight * overlap_ratio
}

/// Multiplier for one disease under the input's category.
pub fn category_multiplier(category: SymptomCategory, disease_name: &str) -> f32 {
    let name = disease_name.to_lowercase();
    match category {
        SymptomCategory::MildOnly => {
            if MILD_BOOST_NAMES.iter().any(|k| name.contains(k)) {
                MILD_BOOST
            } else {
                MILD_PENALTY
            }
        }
        SymptomCategory::Severe => {
            if SEVERE_BOOST_NAMES.iter().any(|k| name.contains(k)) {
                SEVERE_BOOST
            } else {
                1.0
            }
        }
        SymptomCategory::Unclassified => 1.0,
    }
}

/// Adjust, normalize, and rank candidates; keep the top `tuning.top_n`.
/// Ties keep their original order (stable sort, no secondary key).
pub fn rank(
    mut candidates: Vec<ScoredCandidate>,
    category: SymptomCategory,
    tuning: &Tuning,
) -> Vec<ScoredCandidate> {
    for c in candidates.iter_mut() {
        c.final_score *= category_multiplier(category, &c.disease);
    }

    let max = candidates
        .iter()
        .map(|c| c.final_score)
        .fold(f32::NEG_INFINITY, f32::max);
    if max > 0.0 {
        for c in candidates.iter_mut() {
            c.final_score /= max;
        }
    }

    candidates.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
    });
    candidates.truncate(tuning.top_n);
    candidates
}
