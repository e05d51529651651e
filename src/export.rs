use log::info;
use std::path::{Path, PathBuf};

use crate::chart::{render_chart, ChartStyle};
use crate::error::Result;
use crate::individual::Individual;
use crate::render::{pixmap_to_rgb, Canvas};
use crate::stats::History;

pub const CHART_FILE: &str = "fitness_chart.png";
pub const HISTORY_FILE: &str = "history.json";

/// writes every artifact of a run into one output directory
#[derive(Clone, Debug)]
pub struct Exporter {
    dir: PathBuf,
    chart_style: ChartStyle,
}

impl Exporter {
    /// creates the directory (and parents) if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, chart_style: ChartStyle::default() })
    }

    pub fn with_chart_style(mut self, chart_style: ChartStyle) -> Self {
        self.chart_style = chart_style;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// "{generation}_generation_{fitness}_fitness.png", fitness rounded to two places
    pub fn snapshot_path(&self, generation: u64, fitness: f64) -> PathBuf {
        let fitness = fitness_label(fitness);
        self.dir.join(format!("{generation}_generation_{fitness}_fitness.png"))
    }

    /// save the render of `best` for this generation
    pub fn save_snapshot(&self, generation: u64, best: &Individual, canvas: &Canvas) -> Result<PathBuf> {
        profiling::scope!("save_snapshot");
        let path = self.snapshot_path(generation, best.fitness());
        best.render(canvas).save(&path)?;
        info!("snapshot for generation {} written to {}", generation, path.display());
        Ok(path)
    }

    pub fn save_chart(&self, history: &History) -> Result<PathBuf> {
        profiling::scope!("save_chart");
        let path = self.dir.join(CHART_FILE);
        let pix = render_chart(history, &self.chart_style)?;
        pixmap_to_rgb(&pix).save(&path)?;
        info!("fitness chart written to {}", path.display());
        Ok(path)
    }

    pub fn save_history(&self, history: &History) -> Result<PathBuf> {
        let path = self.dir.join(HISTORY_FILE);
        history.save_json(&path)?;
        info!("generation history written to {}", path.display());
        Ok(path)
    }
}

/// two-place rounding printed without trailing zeros, keeping one decimal
/// for whole values: 0.5 -> "0.5", 0.876 -> "0.88", 1.0 -> "1.0"
fn fitness_label(fitness: f64) -> String {
    let rounded = (fitness * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}
