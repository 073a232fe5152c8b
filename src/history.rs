//! history.rs — bounded in-memory log of served predictions for diagnostics.
//!
//! Only derived, non-sensitive fields are kept: top disease, score,
//! confidence, and the input size. Raw symptom text never lands here.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::prediction::{Confidence, Prediction};

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub ts_unix: u64,
    /// `None` when the request ended in the error sentinel.
    pub top_disease: Option<String>,
    pub top_score: f32,
    pub confidence: Option<Confidence>,
    pub symptom_count: usize,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, symptom_count: usize, response: &[Prediction]) {
        let top = response.first().and_then(Prediction::as_ranked);
        let entry = HistoryEntry {
            ts_unix: now_unix(),
            top_disease: top.map(|r| r.disease.clone()),
            top_score: top.map(|r| r.score).unwrap_or(0.0),
            confidence: top.map(|r| r.confidence),
            symptom_count,
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
