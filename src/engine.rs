// src/engine.rs
//! # Prediction Engine
//! Pure, testable pipeline that maps a symptom list → ranked disease results.
//! No I/O during a call; everything it reads is the immutable snapshot built
//! at startup, so concurrent callers share it freely.
//!
//! Policy: sub-score failures (classifier, overlap) degrade silently to a
//! lower-quality ranking; only a total failure to rank anything becomes a
//! user-visible error value. The engine never raises past its boundary — the
//! response is always a non-empty sequence.

use std::collections::HashMap;

use metrics::counter;
use tracing::{info, warn};

use crate::assemble::assemble;
use crate::assets::EngineAssets;
use crate::blend;
use crate::classifier::{class_probabilities, LabelEncoder, ProbabilisticClassifier};
use crate::config::{self, Tuning};
use crate::encoder;
use crate::overlap::{score_overlap, OverlapScore};
use crate::prediction::{Prediction, ScoredCandidate};
use crate::reference::DiseaseTable;
use crate::severity;

/// Message carried by the sentinel for an empty symptom list.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter at least one symptom.";

/// Immutable engine snapshot: vocabulary, model, labels, reference table,
/// tuning — all from one preparation run, swapped atomically on reload.
pub struct PredictionEngine {
    vocabulary: Vec<String>,
    model: Box<dyn ProbabilisticClassifier>,
    labels: LabelEncoder,
    diseases: DiseaseTable,
    tuning: Tuning,
}

impl PredictionEngine {
    pub fn new(assets: EngineAssets, tuning: Tuning) -> Self {
        Self::with_classifier(
            assets.vocabulary,
            Box::new(assets.model),
            assets.labels,
            assets.diseases,
            tuning,
        )
    }

    /// Assemble an engine around any classifier implementation.
    /// The caller is responsible for the pairing of the pieces.
    pub fn with_classifier(
        vocabulary: Vec<String>,
        model: Box<dyn ProbabilisticClassifier>,
        labels: LabelEncoder,
        diseases: DiseaseTable,
        tuning: Tuning,
    ) -> Self {
        Self {
            vocabulary,
            model,
            labels,
            diseases,
            tuning,
        }
    }

    pub fn disease_count(&self) -> usize {
        self.diseases.len()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Rank diseases for the caller's symptoms.
    ///
    /// Always returns a non-empty sequence: ranked results, or one sentinel
    /// carrying an `error` message.
    pub fn predict(&self, symptoms: &[String]) -> Vec<Prediction> {
        // Defensive re-normalization; the extractor collaborator already
        // trims and lowercases, but the HTTP surface is open to anyone.
        let symptoms: Vec<String> = symptoms
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        if symptoms.is_empty() {
            counter!("predict_sentinel_total").increment(1);
            return vec![Prediction::error(EMPTY_INPUT_MESSAGE)];
        }

        let out = match self.rank_candidates(&symptoms) {
            Ok(ranked) => assemble(&ranked, &self.diseases),
            Err(e) => {
                // Unexpected internal fault: surface as an error value with
                // the message preserved for diagnostics, never a crash.
                counter!("predict_sentinel_total").increment(1);
                warn!(error = %e, "prediction pipeline failed");
                vec![Prediction::error(format!("Prediction failed: {e}"))]
            }
        };

        dev_log_prediction(&symptoms, &out);
        out
    }

    /// Encoder → classifier adapter → overlap merge → blender.
    fn rank_candidates(&self, symptoms: &[String]) -> anyhow::Result<Vec<ScoredCandidate>> {
        let vector = encoder::encode(symptoms, &self.vocabulary, self.tuning.similarity_threshold);
        let probs = class_probabilities(
            self.model.as_ref(),
            &vector,
            self.tuning.prob_floor,
            self.tuning.prob_ceiling,
        );

        // Per-request overlap scores keyed by lowercased disease name.
        // A plain map sidesteps join-order and duplicate-key ambiguity; the
        // table is already deduplicated with first-occurrence-wins.
        let mut overlap_by_name: HashMap<String, OverlapScore> =
            HashMap::with_capacity(self.diseases.len());
        for record in self.diseases.records() {
            overlap_by_name.insert(
                record.name.to_lowercase(),
                score_overlap(
                    &record.symptoms,
                    symptoms,
                    self.tuning.similarity_threshold,
                    self.tuning.miss_penalty,
                ),
            );
        }

        let category = severity::classify(symptoms);

        let mut candidates = Vec::with_capacity(probs.len());
        for (index, prob) in probs.iter().enumerate() {
            let Some(name) = self.labels.inverse(index) else {
                anyhow::bail!("classifier class {index} has no label; assets are mismatched");
            };
            // Classes with no reference row keep a zero overlap and are
            // filtered later by the assembler.
            let (overlap_ratio, matched_symptoms) = overlap_by_name
                .get(&name.to_lowercase())
                .map(|o| (o.ratio, o.matched.clone()))
                .unwrap_or((0.0, Vec::new()));

            let final_score = blend::blend_score(*prob, overlap_ratio, &self.tuning);
            candidates.push(ScoredCandidate {
                disease: name.to_string(),
                model_prob: *prob,
                overlap_ratio,
                matched_symptoms,
                final_score,
            });
        }

        Ok(blend::rank(candidates, category, &self.tuning))
    }
}

/// Short, stable hash for log correlation; raw symptom text never hits logs.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Minimal, anonymized dev logger for served predictions.
fn dev_log_prediction(symptoms: &[String], out: &[Prediction]) {
    if !config::dev_logging_enabled() {
        return;
    }
    let id = anon_hash(&symptoms.join(";"));
    let top = out.first().and_then(Prediction::as_ranked);
    info!(
        target: "predict",
        %id,
        symptoms = symptoms.len(),
        top = top.map(|r| r.disease.as_str()).unwrap_or("-"),
        score = top.map(|r| r.score).unwrap_or(0.0),
        "prediction served"
    );
}
