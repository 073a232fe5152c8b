// src/overlap.rs
//! Overlap Scorer: fuzzy coverage of the input against one disease's
//! symptom set, with a linear penalty per unmatched input symptom.
//!
//! `ratio = max(0, matched/input − miss_penalty·(input − matched))`,
//! rounded to 3 decimals. A disease whose symptom set is empty (malformed
//! source row) scores 0 with no matches — a zero, not an error.

use crate::similarity;

/// Coverage result for one disease row.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapScore {
    pub ratio: f32,
    /// Input symptoms that matched, in input order.
    pub matched: Vec<String>,
}

impl OverlapScore {
    pub fn zero() -> Self {
        Self {
            ratio: 0.0,
            matched: Vec::new(),
        }
    }
}

/// Score one disease's symptom tokens against the caller's symptom list.
pub fn score_overlap(
    disease_tokens: &[String],
    input_symptoms: &[String],
    threshold: f32,
    miss_penalty: f32,
) -> OverlapScore {
    if input_symptoms.is_empty() {
        return OverlapScore::zero();
    }

    let matched: Vec<String> = input_symptoms
        .iter()
        .filter(|s| {
            disease_tokens
                .iter()
                .any(|t| similarity::is_match(s, t, threshold))
        })
        .cloned()
        .collect();

    let total = input_symptoms.len() as f32;
    let hit = matched.len() as f32;
    let penalty = (total - hit) * miss_penalty;
    let ratio = round3((hit / total - penalty).max(0.0));

    OverlapScore { ratio, matched }
}

#[inline]
fn round3(x: f32) -> f32 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::DEFAULT_MATCH_THRESHOLD;

    const PENALTY: f32 = 0.1;

    fn syms(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_coverage_scores_one() {
        let s = score_overlap(
            &syms(&["cough", "runny nose", "sneezing"]),
            &syms(&["cough", "runny nose"]),
            DEFAULT_MATCH_THRESHOLD,
            PENALTY,
        );
        assert!((s.ratio - 1.0).abs() < 1e-6);
        assert_eq!(s.matched, syms(&["cough", "runny nose"]));
    }

    #[test]
    fn each_miss_costs_a_tenth_on_top_of_coverage() {
        // 1 of 2 matched: 0.5 − 0.1·1 = 0.4
        let s = score_overlap(
            &syms(&["cough"]),
            &syms(&["cough", "vomiting"]),
            DEFAULT_MATCH_THRESHOLD,
            PENALTY,
        );
        assert!((s.ratio - 0.4).abs() < 1e-6);
        assert_eq!(s.matched, syms(&["cough"]));
    }

    #[test]
    fn ratio_is_floored_at_zero() {
        // 0 of 3 matched: 0 − 0.3 → floored to 0.
        let s = score_overlap(
            &syms(&["cough"]),
            &syms(&["vomiting", "nausea", "headache"]),
            DEFAULT_MATCH_THRESHOLD,
            PENALTY,
        );
        assert_eq!(s.ratio, 0.0);
        assert!(s.matched.is_empty());
    }

    #[test]
    fn malformed_row_scores_zero_without_error() {
        let s = score_overlap(
            &[],
            &syms(&["cough", "fever"]),
            DEFAULT_MATCH_THRESHOLD,
            PENALTY,
        );
        assert_eq!(s, OverlapScore::zero());
    }

    #[test]
    fn fuzzy_token_match_counts() {
        let s = score_overlap(
            &syms(&["sore throat"]),
            &syms(&["sore troat"]),
            DEFAULT_MATCH_THRESHOLD,
            PENALTY,
        );
        assert!((s.ratio - 1.0).abs() < 1e-6);
    }

    #[test]
    fn result_rounds_to_three_decimals() {
        // 1 of 3 matched: 1/3 − 0.2 = 0.13333… → 0.133
        let s = score_overlap(
            &syms(&["cough"]),
            &syms(&["cough", "nausea", "vomiting"]),
            DEFAULT_MATCH_THRESHOLD,
            PENALTY,
        );
        assert!((s.ratio - 0.133).abs() < 1e-6);
    }
}
