// src/reference.rs
//! # Disease Reference Table
//!
//! Maps each known disease to its symptom set, severity, description, and
//! precautions. Loaded once at startup and read-only during prediction.
//!
//! - Loads from JSON rows using the upstream export's column names
//!   (`Disease`, `Symptoms`, `Severity`, `Description`, `Precautions`;
//!   the list fields are `;`-joined strings).
//! - Rows are deduplicated by lowercased name; the first occurrence wins.
//! - A row with a missing or non-string `Symptoms` field keeps its record but
//!   gets an empty symptom set, so it scores zero instead of failing the call.
//! - Includes a built-in `default_seed()` so dev and tests run without assets.

use serde::{Deserialize, Deserializer};
use std::{collections::HashMap, fs, path::Path};

/// Coarse severity of a disease as recorded in the reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Lenient parse; unknown or missing labels fall back to `Moderate`.
    pub fn parse(label: Option<&str>) -> Self {
        match label.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("mild") | Some("low") => Severity::Mild,
            Some("severe") | Some("high") => Severity::Severe,
            _ => Severity::Moderate,
        }
    }
}

/// One raw row as exported by the dataset-preparation collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseRow {
    #[serde(rename = "Disease")]
    pub disease: String,
    #[serde(rename = "Symptoms", default, deserialize_with = "lenient_string")]
    pub symptoms: Option<String>,
    #[serde(rename = "Severity", default)]
    pub severity: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Precautions", default)]
    pub precautions: Option<String>,
}

/// Accept any JSON value in a string column; non-strings become `None`
/// (a malformed cell zeroes that row's overlap instead of failing the load).
fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(de)?;
    Ok(v.as_ref().and_then(|v| v.as_str()).map(str::to_string))
}

/// One normalized reference record.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseRecord {
    pub name: String,
    /// Trimmed, lowercased symptom tokens; empty when the source cell was bad.
    pub symptoms: Vec<String>,
    pub severity: Severity,
    pub description: String,
    pub precautions: Vec<String>,
}

/// The loaded table with a case-insensitive name index.
#[derive(Debug, Clone, Default)]
pub struct DiseaseTable {
    records: Vec<DiseaseRecord>,
    by_name: HashMap<String, usize>,
}

impl DiseaseTable {
    /// Build from raw rows: normalize, dedup by lowercased name (first wins).
    pub fn from_rows(rows: Vec<DiseaseRow>) -> Self {
        let mut records = Vec::with_capacity(rows.len());
        let mut by_name = HashMap::with_capacity(rows.len());

        for row in rows {
            let name = row.disease.trim().to_string();
            if name.is_empty() {
                continue;
            }
            let key = name.to_lowercase();
            if by_name.contains_key(&key) {
                continue; // duplicate name: first occurrence wins
            }

            let symptoms = split_joined(row.symptoms.as_deref(), true);
            let precautions = split_joined(row.precautions.as_deref(), false);

            by_name.insert(key, records.len());
            records.push(DiseaseRecord {
                name,
                symptoms,
                severity: Severity::parse(row.severity.as_deref()),
                description: row.description.unwrap_or_default().trim().to_string(),
                precautions,
            });
        }

        Self { records, by_name }
    }

    /// Parse a JSON array of rows.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let rows: Vec<DiseaseRow> = serde_json::from_str(raw)?;
        Ok(Self::from_rows(rows))
    }

    /// Load from a JSON file; the caller decides how to handle errors.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read disease table at {}: {}",
                path.as_ref().display(),
                e
            )
        })?;
        Self::from_json_str(&raw)
    }

    /// Case-insensitive lookup by disease name.
    pub fn get(&self, name: &str) -> Option<&DiseaseRecord> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Built-in seed covering the common respiratory spectrum.
    /// Used as a fallback when no reference asset is installed.
    pub fn default_seed() -> Self {
        let rows = [
            (
                "Common Cold",
                "cough;runny nose;sneezing;sore throat;headache",
                "Mild",
                "Viral infection of the upper respiratory tract; self-limiting within a week.",
                "rest;drink warm fluids;use saline nasal drops;avoid cold exposure",
            ),
            (
                "Seasonal Allergy",
                "sneezing;runny nose;itchy eyes;blocked nose",
                "Mild",
                "Immune reaction to airborne pollen or dust, recurring in season.",
                "avoid known allergens;keep windows closed;rinse nose with saline;consider antihistamines",
            ),
            (
                "Allergic Rhinitis",
                "sneezing;runny nose;blocked nose;watery eyes",
                "Mild",
                "Inflammation of the nasal lining triggered by allergens.",
                "identify triggers;use air filtration;rinse nose with saline;limit outdoor time on high-pollen days",
            ),
            (
                "Sinusitis",
                "headache;blocked nose;runny nose;fever",
                "Mild",
                "Inflammation of the sinus cavities, often after a cold.",
                "apply warm compresses;stay hydrated;use steam inhalation;sleep with head elevated",
            ),
            (
                "Influenza",
                "fever;body ache;fatigue;headache;cough",
                "Moderate",
                "Contagious viral illness with abrupt onset of fever and aches.",
                "rest at home;drink plenty of fluids;take fever reducers as directed;avoid contact with others",
            ),
            (
                "Bronchitis",
                "cough;chest pain;fatigue;shortness of breath",
                "Moderate",
                "Inflammation of the bronchial tubes with persistent productive cough.",
                "avoid smoke and irritants;use a humidifier;rest;seek care if breathing worsens",
            ),
            (
                "Gastroenteritis",
                "vomiting;nausea;fever;body ache",
                "Moderate",
                "Inflammation of the stomach and intestines, usually viral.",
                "sip oral rehydration solution;eat bland food;wash hands frequently;rest",
            ),
            (
                "Pneumonia",
                "high fever;chest pain;severe cough;shortness of breath",
                "Severe",
                "Infection inflaming the air sacs of one or both lungs.",
                "consult a doctor promptly;complete prescribed antibiotics;monitor breathing;rest",
            ),
            (
                "COVID-19",
                "fever;cough;fatigue;shortness of breath;sore throat",
                "Severe",
                "Respiratory illness caused by the SARS-CoV-2 virus.",
                "isolate from others;monitor oxygen saturation;consult a doctor;rest and hydrate",
            ),
            (
                "Tuberculosis",
                "chronic cough;bloody sputum;fever;fatigue",
                "Severe",
                "Bacterial infection of the lungs with prolonged cough and weight loss.",
                "seek medical evaluation;complete the full treatment course;ventilate living spaces;cover coughs",
            ),
        ];

        let rows = rows
            .into_iter()
            .map(|(d, s, sev, desc, prec)| DiseaseRow {
                disease: d.to_string(),
                symptoms: Some(s.to_string()),
                severity: Some(sev.to_string()),
                description: Some(desc.to_string()),
                precautions: Some(prec.to_string()),
            })
            .collect();

        Self::from_rows(rows)
    }
}

/// Split a `;`-joined cell into trimmed tokens, optionally lowercased.
fn split_joined(raw: Option<&str>, lowercase: bool) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for part in raw.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let token = if lowercase {
            part.to_lowercase()
        } else {
            part.to_string()
        };
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out
}
