// src/encoder.rs
//! Feature Encoder: symptom strings → weighted vector over the vocabulary.
//!
//! The vocabulary is the fixed, ordered feature list the classifier was
//! trained against; index position is the feature's identity. Slot i receives
//! the severity weight of an input symptom that fuzzily matches vocabulary
//! entry i, else 0.0. When several inputs match the same slot, the last one
//! processed wins (weights of near-duplicates are close by construction).
//!
//! Flat O(F × |symptoms|) scan; F sits in the low hundreds, no index needed.

use crate::severity;
use crate::similarity;

/// Encode the caller's symptoms into a feature row aligned to `vocabulary`.
/// Inputs arrive trimmed and lowercased; unmatched symptoms contribute nothing.
pub fn encode(symptoms: &[String], vocabulary: &[String], threshold: f32) -> Vec<f32> {
    let mut vector = vec![0.0f32; vocabulary.len()];
    for (i, known) in vocabulary.iter().enumerate() {
        for s in symptoms {
            if similarity::is_match(s, known, threshold) {
                vector[i] = severity::weight_for(s);
            }
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::DEFAULT_MATCH_THRESHOLD;

    fn syms(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn vocab() -> Vec<String> {
        syms(&["chest pain", "cough", "fever", "runny nose"])
    }

    #[test]
    fn vector_length_always_equals_vocabulary_length() {
        let v = encode(&syms(&["cough"]), &vocab(), DEFAULT_MATCH_THRESHOLD);
        assert_eq!(v.len(), 4);
        let v = encode(&[], &vocab(), DEFAULT_MATCH_THRESHOLD);
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn exact_match_sets_severity_weight() {
        let v = encode(&syms(&["chest pain"]), &vocab(), DEFAULT_MATCH_THRESHOLD);
        assert!((v[0] - 1.6).abs() < 1e-6);
        assert_eq!(v[1], 0.0);
    }

    #[test]
    fn fuzzy_match_uses_input_symptoms_weight() {
        // "feverr" is close enough to "fever" but has no table entry → 1.0.
        let v = encode(&syms(&["feverr"]), &vocab(), DEFAULT_MATCH_THRESHOLD);
        assert!((v[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unmatched_symptoms_leave_zeros() {
        let v = encode(&syms(&["itchy elbow"]), &vocab(), DEFAULT_MATCH_THRESHOLD);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn last_matching_input_wins_contested_slot() {
        // Both inputs fuzzily match the "fever" slot; the later one decides
        // the weight. Locked on purpose: reordering inputs may change scores.
        let a = encode(&syms(&["feverr", "fever"]), &vocab(), DEFAULT_MATCH_THRESHOLD);
        assert!((a[2] - 1.2).abs() < 1e-6, "table weight of 'fever' wins");

        let b = encode(&syms(&["fever", "feverr"]), &vocab(), DEFAULT_MATCH_THRESHOLD);
        assert!((b[2] - 1.0).abs() < 1e-6, "default weight of 'feverr' wins");
    }
}
