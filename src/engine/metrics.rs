use log::debug;

use crate::fitness::MetricsSnapshot;
use crate::stats::GenerationStats;

use super::Engine;

impl Engine {
    /// sad/px and psnr of the current best render, for diagnostics only.
    /// selection is driven purely by `Individual::fitness`.
    pub fn best_metrics(&self) -> MetricsSnapshot {
        profiling::scope!("best_metrics");
        self.population.best().metrics(&self.target)
    }

    /// best fitness of the all-transparent starting population
    #[inline]
    pub fn initial_best(&self) -> f64 {
        self.initial_best
    }

    /// fitness gained by the best individual since the blank start
    #[inline]
    pub fn improvement(&self) -> f64 {
        self.population.best().fitness() - self.initial_best
    }

    // the render for psnr is only paid for when debug logging is on
    pub(super) fn log_generation(&self, stats: &GenerationStats) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        let metrics = self.best_metrics();
        debug!(
            "gen {}: best {:.6} mean {:.6} std {:.6} | sad/px {:.2} psnr {:.2} dB | {} visible triangles",
            stats.generation,
            stats.best,
            stats.mean,
            stats.std_dev,
            metrics.sad_per_px,
            metrics.psnr,
            self.population.best().visible_count()
        );
    }
}
