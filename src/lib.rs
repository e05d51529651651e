//! trievolve: approximate a target image with translucent triangles using an
//! elitist generational genetic algorithm.

pub mod chart;
pub mod dna;
pub mod engine;
pub mod error;
pub mod export;
pub mod fitness;
pub mod geom;
pub mod individual;
pub mod population;
pub mod render;
pub mod settings;
pub mod stats;

pub use dna::Gene;
pub use engine::Engine;
pub use error::{EvolveError, Result};
pub use fitness::Target;
pub use individual::Individual;
pub use population::Population;
pub use settings::Settings;
