// Engine module organization
// the generational driver plus its per-generation diagnostics

pub mod metrics;

use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::Result;
use crate::export::Exporter;
use crate::fitness::Target;
use crate::population::Population;
use crate::settings::Settings;
use crate::stats::{GenerationStats, History};

// history grows past this on demand
const HISTORY_PREALLOC: u64 = 1 << 16;

/// runs the generational loop and owns all evolution state of a session
pub struct Engine {
    rng: Pcg32,
    settings: Settings,
    target: Target,
    pub population: Population,
    pub history: History,
    pub generation: u64, // generations completed so far
    pub seed: u64,       // the seed actually used (drawn at random if settings had none)
    initial_best: f64,   // best fitness of the blank starting population
    report_progress: bool, // per-generation progress line on stdout
}

impl Engine {
    /// validate settings, seed the rng and build the initial (all-transparent) population
    pub fn new(settings: Settings, target: Target) -> Result<Self> {
        profiling::scope!("Engine::new");
        settings.validate()?;

        let seed = settings.seed.unwrap_or_else(rand::random);
        info!("random seed: {}", seed);
        let mut rng = Pcg32::seed_from_u64(seed);

        let population =
            Population::initial(&mut rng, settings.population_size, settings.individual_size, &target)?;
        info!(
            "initial population: {} individuals x {} triangles, blank fitness {:.6}",
            population.len(),
            settings.individual_size,
            population.best().fitness()
        );

        let initial_best = population.best().fitness();
        let history = History::with_capacity(settings.generation_count.min(HISTORY_PREALLOC) as usize);
        Ok(Self {
            rng,
            settings,
            target,
            population,
            history,
            generation: 0,
            seed,
            initial_best,
            report_progress: true,
        })
    }

    /// silence the stdout progress line (logging is unaffected)
    pub fn with_progress(mut self, report_progress: bool) -> Self {
        self.report_progress = report_progress;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// one generation: select + replace, then record the new distribution
    pub fn step(&mut self) -> Result<GenerationStats> {
        profiling::scope!("Engine::step");
        self.population.select_parents_and_replace(
            &mut self.rng,
            self.settings.elite_count,
            self.settings.mutation_rate,
            &self.target,
        )?;
        self.generation += 1;

        let stats = self.population.stats(self.generation);
        self.history.push(stats);
        self.log_generation(&stats);
        Ok(stats)
    }

    /// run all configured generations, exporting snapshots on schedule, then the
    /// chart and history. the first failure aborts the run.
    pub fn run(&mut self, exporter: &Exporter) -> Result<&History> {
        profiling::scope!("Engine::run");
        info!(
            "evolving for {} generations (elite {}, mutation rate {})",
            self.settings.generation_count, self.settings.elite_count, self.settings.mutation_rate
        );

        while self.generation < self.settings.generation_count {
            let stats = self.step()?;
            if self.report_progress {
                println!(
                    "generation: {} | best fitness: {} | worst: {}",
                    stats.generation, stats.best, stats.worst
                );
            }
            if self.snapshot_due() {
                exporter.save_snapshot(self.generation, self.population.best(), self.target.canvas())?;
            }
            profiling::finish_frame!();
        }

        exporter.save_chart(&self.history)?;
        exporter.save_history(&self.history)?;
        info!("run finished after {} generations", self.generation);
        Ok(&self.history)
    }

    #[inline]
    fn snapshot_due(&self) -> bool {
        let interval = self.settings.snapshot_interval;
        interval > 0 && self.generation % interval == 0
    }
}
