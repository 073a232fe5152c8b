// src/assets.rs
//! Loading of the trained asset bundle: vocabulary, model, label encoder,
//! disease reference table.
//!
//! The four files are produced together by one training/preparation run and
//! only make sense together. Loading enforces that pairing: a present but
//! mutually inconsistent bundle is a hard configuration error at startup,
//! never something to limp past at runtime. A completely absent bundle falls
//! back to a built-in seed so development and tests work out of the box.

use std::{collections::BTreeSet, fs, path::Path};

use tracing::info;

use crate::classifier::{LabelEncoder, LinearModel, ProbabilisticClassifier};
use crate::config::EngineConfig;
use crate::reference::DiseaseTable;

pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const MODEL_FILE: &str = "model.json";
pub const LABELS_FILE: &str = "labels.json";
pub const DISEASES_FILE: &str = "diseases.json";

/// One coherent, validated asset bundle.
pub struct EngineAssets {
    /// Ordered feature names; index position is the feature's identity.
    pub vocabulary: Vec<String>,
    pub model: LinearModel,
    pub labels: LabelEncoder,
    pub diseases: DiseaseTable,
}

impl EngineAssets {
    /// Load and validate the bundle under `config.asset_dir`.
    ///
    /// All four files present → load + validate. None present → built-in
    /// seed. Anything in between is an incomplete install and refused.
    pub fn load(config: &EngineConfig) -> anyhow::Result<Self> {
        let dir = &config.asset_dir;
        let files = [VOCABULARY_FILE, MODEL_FILE, LABELS_FILE, DISEASES_FILE];
        let present = files.iter().filter(|f| dir.join(f).exists()).count();

        if present == 0 {
            info!(dir = %dir.display(), "no asset bundle found; using built-in seed");
            let assets = Self::default_seed();
            assets.validate()?;
            return Ok(assets);
        }
        if present < files.len() {
            anyhow::bail!(
                "incomplete asset bundle in {}: expected all of {:?}",
                dir.display(),
                files
            );
        }

        let vocabulary: Vec<String> =
            serde_json::from_str(&read(dir.join(VOCABULARY_FILE).as_path())?)?;
        let model = LinearModel::from_json_str(&read(dir.join(MODEL_FILE).as_path())?)?;
        let labels = LabelEncoder::from_json_str(&read(dir.join(LABELS_FILE).as_path())?)?;
        let diseases = DiseaseTable::load_from_file(dir.join(DISEASES_FILE))?;

        let assets = Self {
            vocabulary,
            model,
            labels,
            diseases,
        };
        assets.validate()?;
        info!(
            features = assets.vocabulary.len(),
            classes = assets.labels.len(),
            diseases = assets.diseases.len(),
            "asset bundle loaded"
        );
        Ok(assets)
    }

    /// Enforce the single-training-run pairing invariant.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.vocabulary.is_empty() {
            anyhow::bail!("vocabulary is empty");
        }
        self.model.validate(self.vocabulary.len())?;
        if self.labels.len() != self.model.class_count() {
            anyhow::bail!(
                "label encoder has {} classes, model has {}; assets are not from one training run",
                self.labels.len(),
                self.model.class_count()
            );
        }
        if self.diseases.is_empty() {
            anyhow::bail!("disease reference table is empty");
        }
        Ok(())
    }

    /// Self-consistent bundle derived from the seed reference table:
    /// the vocabulary is the sorted set of its symptom tokens, classes are
    /// the disease names in label-encoder (sorted) order, and each class row
    /// carries unit weight on its own symptoms.
    pub fn default_seed() -> Self {
        let diseases = DiseaseTable::default_seed();

        let vocabulary: Vec<String> = diseases
            .records()
            .iter()
            .flat_map(|r| r.symptoms.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let classes: Vec<String> = diseases
            .records()
            .iter()
            .map(|r| r.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let weights = classes
            .iter()
            .map(|name| {
                let record = diseases.get(name).expect("seed class has a seed record");
                vocabulary
                    .iter()
                    .map(|v| {
                        if record.symptoms.contains(v) {
                            1.0
                        } else {
                            0.0
                        }
                    })
                    .collect::<Vec<f32>>()
            })
            .collect::<Vec<_>>();

        Self {
            vocabulary,
            model: LinearModel {
                weights,
                intercepts: Vec::new(),
            },
            labels: LabelEncoder::new(classes),
            diseases,
        }
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read asset {}: {}", path.display(), e))
}
