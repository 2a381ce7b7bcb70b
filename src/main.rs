use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use judgeline::config::EngineConfig;
use judgeline::model::Chart;
use judgeline::session::{AutoplayMode, run_headless};
use judgeline::util::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "judgeline", about = "Rhythm game timing engine", version)]
struct Args {
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine config JSON file
    #[arg(long, global = true, value_name = "FILE", env = "JUDGELINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a chart on a simulated clock and print the result
    Simulate {
        /// Chart JSON file
        chart: PathBuf,
        /// Host refresh rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Send no input, so every note is missed
        #[arg(long)]
        no_autoplay: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a chart and print a summary
    Check {
        /// Chart JSON file
        chart: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => EngineConfig::load(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Simulate {
            chart,
            fps,
            no_autoplay,
            json,
        } => {
            anyhow::ensure!(fps.is_finite() && fps > 0.0, "fps must be positive");
            config.autoplay = if no_autoplay {
                AutoplayMode::Off
            } else {
                AutoplayMode::Full
            };
            let chart = Chart::from_path(&chart, config.lane_count)?;
            info!("simulating '{}' at {} fps", chart.meta.title, fps);

            let outcome = run_headless(chart, config, fps)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                let s = &outcome.summary;
                println!("Score:     {}", s.score);
                println!("Max combo: {}", s.max_combo);
                println!("Accuracy:  {:.2}%", s.accuracy);
                println!("Grade:     {}", s.grade.as_str());
                println!(
                    "PERFECT {}  GREAT {}  GOOD {}  BAD {}  MISS {}",
                    s.stats.perfect, s.stats.great, s.stats.good, s.stats.bad, s.stats.miss
                );
                println!(
                    "{} frames, {} updates, ended at {:.1}ms",
                    outcome.frames, outcome.updates, outcome.song_time_ms
                );
            }
            anyhow::ensure!(outcome.finished, "simulation did not reach the end of the chart");
        }
        Command::Check { chart } => {
            let chart = Chart::from_path(&chart, config.lane_count)?;
            println!("Title:   {}", chart.meta.title);
            println!("Artist:  {}", chart.meta.artist);
            println!("BPM:     {}", chart.meta.bpm);
            println!("Level:   {} {}", chart.meta.difficulty, chart.meta.level);
            println!(
                "Notes:   {} ({} holds)",
                chart.note_count(),
                chart.hold_count()
            );
            println!("Length:  {}ms", chart.last_note_end_ms());
        }
    }

    Ok(())
}
