// src/classifier.rs
//! Classifier Adapter: the seam to the externally trained model.
//!
//! The engine only needs one operation — a class-probability distribution for
//! a single feature row — expressed by [`ProbabilisticClassifier`]. The
//! adapter around it guarantees a usable distribution no matter what the
//! model does: any failure degrades to a uniform distribution (a named,
//! counted fallback path, never surfaced to the caller), and every output is
//! clamped into a band and renormalized so no class saturates to 0 or 1.
//!
//! [`LinearModel`] is the shipped inference implementation: one weight row
//! and intercept per class, softmax over the dot products. Inference only;
//! training happens upstream.

use metrics::counter;
use serde::Deserialize;
use tracing::warn;

/// Probability-output seam of the trained multi-class model.
pub trait ProbabilisticClassifier: Send + Sync {
    /// Number of classes in the model's output distribution.
    fn class_count(&self) -> usize;

    /// Class probabilities for one feature row, aligned to the class order.
    fn predict_proba(&self, features: &[f32]) -> anyhow::Result<Vec<f32>>;
}

/// Maps the model's class indices back to disease names.
/// Class order and name order come from the same training run.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let classes: Vec<String> = serde_json::from_str(raw)?;
        Ok(Self::new(classes))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Disease name for a class index.
    pub fn inverse(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Linear softmax model: `p = softmax(W·x + b)`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    /// One row per class; each row as long as the feature vocabulary.
    pub weights: Vec<Vec<f32>>,
    #[serde(default)]
    pub intercepts: Vec<f32>,
}

impl LinearModel {
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Check internal consistency against the vocabulary this model was
    /// trained with. A mismatch is a configuration error, not a runtime one.
    pub fn validate(&self, feature_count: usize) -> anyhow::Result<()> {
        if self.weights.is_empty() {
            anyhow::bail!("model has no class weight rows");
        }
        for (i, row) in self.weights.iter().enumerate() {
            if row.len() != feature_count {
                anyhow::bail!(
                    "model class row {} has {} features, vocabulary has {}",
                    i,
                    row.len(),
                    feature_count
                );
            }
        }
        if !self.intercepts.is_empty() && self.intercepts.len() != self.weights.len() {
            anyhow::bail!(
                "model has {} intercepts for {} classes",
                self.intercepts.len(),
                self.weights.len()
            );
        }
        Ok(())
    }
}

impl ProbabilisticClassifier for LinearModel {
    fn class_count(&self) -> usize {
        self.weights.len()
    }

    fn predict_proba(&self, features: &[f32]) -> anyhow::Result<Vec<f32>> {
        let logits: Vec<f32> = self
            .weights
            .iter()
            .enumerate()
            .map(|(c, row)| {
                if row.len() != features.len() {
                    anyhow::bail!(
                        "feature row has {} entries, model expects {}",
                        features.len(),
                        row.len()
                    );
                }
                let dot: f32 = row.iter().zip(features).map(|(w, x)| w * x).sum();
                Ok(dot + self.intercepts.get(c).copied().unwrap_or(0.0))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(softmax(&logits))
    }
}

/// Numerically stable softmax.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Run the model with the engine's guarantees applied:
/// fallback → clamp into `[floor, ceiling]` → renormalize to sum 1.
///
/// Returns one probability per class; empty only when the model knows no
/// classes at all.
pub fn class_probabilities(
    model: &dyn ProbabilisticClassifier,
    features: &[f32],
    floor: f32,
    ceiling: f32,
) -> Vec<f32> {
    let n = model.class_count();
    if n == 0 {
        return Vec::new();
    }

    let mut probs = match model.predict_proba(features) {
        Ok(p) if p.len() == n && p.iter().all(|x| x.is_finite()) => p,
        Ok(p) => {
            counter!("predict_classifier_fallback_total").increment(1);
            warn!(
                got = p.len(),
                expected = n,
                "classifier returned a malformed distribution; using uniform"
            );
            uniform(n)
        }
        Err(e) => {
            counter!("predict_classifier_fallback_total").increment(1);
            warn!(error = %e, "classifier probability call failed; using uniform");
            uniform(n)
        }
    };

    for p in probs.iter_mut() {
        *p = p.clamp(floor, ceiling);
    }
    let sum: f32 = probs.iter().sum();
    if sum > 0.0 {
        for p in probs.iter_mut() {
            *p /= sum;
        }
    }
    probs
}

fn uniform(n: usize) -> Vec<f32> {
    vec![1.0 / n as f32; n]
}
