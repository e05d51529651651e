use clap::Parser;
use std::path::PathBuf;
use std::process;

use trievolve::engine::Engine;
use trievolve::error::Result;
use trievolve::export::Exporter;
use trievolve::fitness::Target;
use trievolve::settings::Settings;

/// evolve a set of translucent triangles until they look like the target image
///
/// writes snapshots of the best render, history.json and fitness_chart.png to the
/// output directory. the chart carries no text: its lines and the legend swatches
/// in the top-right corner are, left to right, best (green), worst (red),
/// mean (blue) and standard deviation (orange).
#[derive(Parser, Debug)]
#[command(name = "trievolve", version)]
struct Args {
    /// image to approximate
    target: PathBuf,

    /// individuals per generation [default: 100]
    #[arg(long)]
    population_size: Option<usize>,

    /// triangles per individual [default: 200]
    #[arg(long)]
    individual_size: Option<usize>,

    /// per-gene mutation probability [default: 0.05]
    #[arg(long)]
    mutation_rate: Option<f64>,

    /// top individuals kept each generation and used as parents [default: 5]
    #[arg(long)]
    elite_count: Option<usize>,

    /// number of generations to run [default: 1000]
    #[arg(long)]
    generations: Option<u64>,

    /// save the best render every N generations, 0 disables [default: 100]
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// alpha of a visible triangle [default: 50]
    #[arg(long)]
    alpha: Option<u8>,

    /// rng seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// anti-aliased triangle edges
    #[arg(long)]
    antialias: bool,

    /// where snapshots, the chart and history.json are written
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// load settings from a json file (flags still win)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// write the effective settings to a json file before running
    #[arg(long)]
    save_settings: Option<PathBuf>,

    /// no per-generation progress on stdout
    #[arg(long)]
    quiet: bool,
}

impl Args {
    /// defaults <- settings file <- flags
    fn resolve_settings(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => {
                log::info!("loading settings from {}", path.display());
                Settings::load(path)?
            }
            None => Settings::default(),
        };

        if let Some(v) = self.population_size {
            settings.population_size = v;
        }
        if let Some(v) = self.individual_size {
            settings.individual_size = v;
        }
        if let Some(v) = self.mutation_rate {
            settings.mutation_rate = v;
        }
        if let Some(v) = self.elite_count {
            settings.elite_count = v;
        }
        if let Some(v) = self.generations {
            settings.generation_count = v;
        }
        if let Some(v) = self.snapshot_interval {
            settings.snapshot_interval = v;
        }
        if let Some(v) = self.alpha {
            settings.visible_alpha = v;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.antialias {
            settings.antialias = true;
        }
        Ok(settings)
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = args.resolve_settings()?;
    settings.validate()?;
    if let Some(path) = &args.save_settings {
        settings.save(path)?;
        log::info!("settings written to {}", path.display());
    }

    log::info!("loading target {}", args.target.display());
    let target = Target::open(&args.target, &settings)?;
    let (w, h) = target.dimensions();
    log::info!("target is {}x{}", w, h);

    let exporter = Exporter::new(&args.output_dir)?;
    let mut engine = Engine::new(settings, target)?.with_progress(!args.quiet);
    let history = engine.run(&exporter)?;
    if let Some(last) = history.last() {
        log::info!("final best fitness {:.6} (mean {:.6})", last.best, last.mean);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    #[cfg(feature = "parallel")]
    {
        // name rayon's worker threads once at startup
        let _ = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("rayon-{i}"))
            .build_global();
    }

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn test_flags_default_to_settings_defaults() {
        let args = Args::parse_from(["trievolve", "target.png"]);
        assert_eq!(args.resolve_settings().unwrap(), Settings::default());
        assert_eq!(args.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_flags_override_settings_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let file = Settings { population_size: 30, elite_count: 4, mutation_rate: 0.1, ..Settings::default() };
        file.save(&path).unwrap();

        let path_arg = path.to_string_lossy().into_owned();
        let args = Args::parse_from([
            "trievolve",
            "target.png",
            "--settings",
            path_arg.as_str(),
            "--elite-count",
            "6",
            "--seed",
            "9",
        ]);
        let settings = args.resolve_settings().unwrap();
        assert_eq!(settings.population_size, 30);
        assert_eq!(settings.mutation_rate, 0.1);
        assert_eq!(settings.elite_count, 6);
        assert_eq!(settings.seed, Some(9));
    }

    #[test]
    fn test_long_help_explains_the_chart_colors() {
        let help = Args::command().render_long_help().to_string();
        assert!(help.contains("fitness_chart.png"));
        assert!(help.contains("best (green)"));
        assert!(help.contains("standard deviation (orange)"));
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        let args = Args::parse_from(["trievolve", "t.png", "--settings", "/nonexistent/settings.json"]);
        assert!(args.resolve_settings().is_err());
    }
}
