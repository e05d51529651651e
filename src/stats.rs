use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// fitness distribution of one generation (after its re-sort)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// 1-based generation index
    pub generation: u64,
    pub best: f64,
    pub worst: f64,
    pub mean: f64,
    /// population standard deviation (divides by n, not n - 1)
    pub std_dev: f64,
}

impl GenerationStats {
    pub fn from_values(generation: u64, values: &[f64]) -> Self {
        let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = mean(values);
        Self { generation, best, worst, mean, std_dev: std_dev(values, mean) }
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// per-generation records of a whole run, in generation order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub generations: Vec<GenerationStats>,
}

impl History {
    pub fn with_capacity(n: usize) -> Self {
        Self { generations: Vec::with_capacity(n) }
    }

    pub fn push(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn last(&self) -> Option<&GenerationStats> {
        self.generations.last()
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
