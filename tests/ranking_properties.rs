// tests/ranking_properties.rs
//
// Invariants of the ranked output, swept over randomized symptom samples:
// bounded length, score range, tier consistency, descending order, and
// idempotence. The engine runs on the built-in seed bundle.

use rand::seq::IndexedRandom;
use rand::Rng;

use symptom_triage_engine::assets::EngineAssets;
use symptom_triage_engine::config::Tuning;
use symptom_triage_engine::engine::PredictionEngine;
use symptom_triage_engine::prediction::{Confidence, Prediction};

fn seed_engine() -> PredictionEngine {
    PredictionEngine::new(EngineAssets::default_seed(), Tuning::default())
}

fn symptom_pool() -> Vec<String> {
    [
        "cough",
        "runny nose",
        "sneezing",
        "sore throat",
        "headache",
        "fatigue",
        "fever",
        "high fever",
        "vomiting",
        "nausea",
        "body ache",
        "chest pain",
        "shortness of breath",
        "bloody sputum",
        "blocked nose",
        "itchy eyes",
        "made up symptom",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn assert_ranking_invariants(out: &[Prediction]) {
    assert!(!out.is_empty(), "response is never empty");
    assert!(out.len() <= 5, "at most five results");

    let mut prev = f32::INFINITY;
    for p in out {
        let r = p.as_ranked().expect("non-sentinel responses are ranked");
        assert!(
            (0.0..=100.0).contains(&r.score),
            "score out of range: {} for {}",
            r.score,
            r.disease
        );
        assert_eq!(
            r.confidence,
            Confidence::from_score(r.score),
            "tier must follow the fixed thresholds"
        );
        assert!(prev >= r.score, "scores must be descending");
        prev = r.score;
    }
}

#[test]
fn randomized_samples_hold_all_ranking_invariants() {
    let engine = seed_engine();
    let pool = symptom_pool();
    let mut rng = rand::rng();

    for _ in 0..50 {
        let k = rng.random_range(1..=4);
        let sample: Vec<String> = pool.choose_multiple(&mut rng, k).cloned().collect();

        let out = engine.predict(&sample);
        if out[0].is_error() {
            // Only the no-candidate sentinel is acceptable here, and only as
            // a one-element response.
            assert_eq!(out.len(), 1);
            continue;
        }
        assert_ranking_invariants(&out);
    }
}

#[test]
fn repeated_calls_are_identical() {
    let engine = seed_engine();
    let pool = symptom_pool();
    let mut rng = rand::rng();

    for _ in 0..20 {
        let k = rng.random_range(1..=4);
        let sample: Vec<String> = pool.choose_multiple(&mut rng, k).cloned().collect();
        assert_eq!(
            engine.predict(&sample),
            engine.predict(&sample),
            "engine must be a pure function of input + snapshot"
        );
    }
}

#[test]
fn empty_input_serializes_as_error_sentinel() {
    let out = seed_engine().predict(&[]);
    let v = serde_json::to_value(&out).unwrap();

    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert!(arr[0].get("error").is_some());
    assert!(arr[0].get("disease").is_none());
    assert!(arr[0].get("score").is_none());
}

#[test]
fn unknown_symptoms_still_rank_from_the_prior() {
    let engine = seed_engine();
    let out = engine.predict(&["made up symptom".to_string()]);
    assert_ranking_invariants(&out);
    for p in &out {
        assert!(p.as_ranked().unwrap().matched_symptoms.is_empty());
    }
}
