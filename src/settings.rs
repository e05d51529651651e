//! run settings for trievolve
//! fixed at process start: defaults, then the optional JSON file, then CLI overrides
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EvolveError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// number of individuals kept in the population
    pub population_size: usize,
    /// number of triangles per genome
    pub individual_size: usize,
    /// probability per gene per offspring of being replaced by a fresh visible gene
    pub mutation_rate: f64,
    /// top-ranked individuals used as parents and never overwritten (must be >= 2)
    pub elite_count: usize,
    pub generation_count: u64,
    /// export the best render every N generations (0 = never)
    pub snapshot_interval: u64,

    // drawing
    /// opacity of freshly mutated triangles (0-255)
    pub visible_alpha: u8,
    pub antialias: bool,

    /// fixed seed for reproducible runs, random when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            population_size: 100,
            individual_size: 200,
            mutation_rate: 0.05,
            elite_count: 5,
            generation_count: 1000,
            snapshot_interval: 100,

            visible_alpha: 50,
            // hard-edged fills, like a plain polygon scanline fill
            antialias: false,

            seed: None,
        }
    }
}

impl Settings {
    /// load settings from a JSON file. missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        Ok(settings)
    }

    /// save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// reject parameter combinations the generational step can't work with
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(EvolveError::InvalidSettings(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.elite_count < 2 {
            return Err(EvolveError::InvalidSettings(format!(
                "elite_count must be at least 2 (two distinct parents), got {}",
                self.elite_count
            )));
        }
        if self.elite_count > self.population_size {
            return Err(EvolveError::InvalidSettings(format!(
                "elite_count ({}) exceeds population_size ({})",
                self.elite_count, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvolveError::InvalidSettings(format!(
                "mutation_rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if self.visible_alpha == 0 {
            return Err(EvolveError::InvalidSettings(
                "visible_alpha of 0 would make every mutation invisible".to_string(),
            ));
        }
        Ok(())
    }
}
