// src/assemble.rs
//! Result Assembler: join ranked candidates back to their reference rows and
//! shape the final response sequence.
//!
//! A candidate whose reference row is missing is dropped silently — that is a
//! data inconsistency between model classes and the table, counted but never
//! fatal. An empty end result becomes the one-element error sentinel so the
//! renderer never sees a bare empty list.

use metrics::counter;
use tracing::warn;

use crate::prediction::{Confidence, Prediction, PredictionResult, ScoredCandidate};
use crate::reference::DiseaseTable;

/// Message carried by the sentinel when nothing survives assembly.
pub const NO_MATCH_MESSAGE: &str =
    "No diseases match your symptom pattern. Try adding more details.";

/// Build the response sequence from ranked candidates.
pub fn assemble(ranked: &[ScoredCandidate], table: &DiseaseTable) -> Vec<Prediction> {
    let mut out = Vec::with_capacity(ranked.len());

    for c in ranked {
        let Some(record) = table.get(&c.disease) else {
            counter!("predict_dropped_candidate_total").increment(1);
            warn!(disease = %c.disease, "ranked disease has no reference row; dropping");
            continue;
        };

        let score = round1(c.final_score * 100.0);
        out.push(Prediction::Ranked(PredictionResult {
            disease: c.disease.clone(),
            score,
            confidence: Confidence::from_score(score),
            description: record.description.clone(),
            precautions: record.precautions.clone(),
            matched_symptoms: c.matched_symptoms.clone(),
        }));
    }

    if out.is_empty() {
        counter!("predict_sentinel_total").increment(1);
        return vec![Prediction::error(NO_MATCH_MESSAGE)];
    }
    out
}

#[inline]
fn round1(x: f32) -> f32 {
    (x * 10.0).round() / 10.0
}
