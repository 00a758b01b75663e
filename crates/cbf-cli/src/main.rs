// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Mission Runner CLI
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `cbf` — fly a mission against the trust kernel from the terminal.
//!
//! ```text
//! cbf fly --ticks 30 --seed 7 --tick-ms 500 --blackbox flight.jsonl --chart
//! cbf replay --input recorded.jsonl --blackbox flight.jsonl
//! cbf report --blackbox flight.jsonl --chart
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to see every
//! penalty decision.

mod render;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use cbf_core::{
    read_jsonl, Blackbox, FlightReport, FlightSession, JsonlSink, ReplaySource, ScoreTrace,
    TelemetrySource,
};
use cbf_sim::RandomTelemetry;
use cbf_types::{BlackboxRecord, CbfConfig};

#[derive(Parser, Debug)]
#[command(name = "cbf", version, about = "Onboard trust evaluator mission runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fly a mission on simulated telemetry.
    Fly {
        /// Number of ticks to fly.
        #[arg(long, default_value_t = 30)]
        ticks: u64,
        /// Simulator seed. Defaults to a time-derived seed.
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        common: MissionArgs,
    },
    /// Fly a mission on recorded telemetry (JSON Lines, one snapshot per line).
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        common: MissionArgs,
    },
    /// Print the post-flight report for a persisted blackbox.
    Report {
        #[arg(long)]
        blackbox: PathBuf,
        /// Also draw the score chart.
        #[arg(long)]
        chart: bool,
    },
}

#[derive(Args, Debug)]
struct MissionArgs {
    /// Vehicle name shown in the banner.
    #[arg(long, default_value = "CBF-UAV")]
    name: String,
    /// JSON config overriding penalties and mode thresholds.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Delay between ticks in milliseconds.
    #[arg(long, default_value_t = 0)]
    tick_ms: u64,
    /// Write the blackbox to this JSON Lines file.
    #[arg(long)]
    blackbox: Option<PathBuf>,
    /// Draw the score chart after landing.
    #[arg(long)]
    chart: bool,
    /// Suppress per-tick console lines.
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fly {
            ticks,
            seed,
            common,
        } => {
            let seed = seed.unwrap_or_else(time_seed);
            log::info!("simulated telemetry, seed {seed}");
            let mut source = RandomTelemetry::new(seed, ticks);
            run_mission(&mut source, ticks as usize, &common)
        }
        Commands::Replay { input, common } => {
            let mut source = ReplaySource::from_path(&input)
                .with_context(|| format!("loading replay {}", input.display()))?;
            let ticks = source.remaining();
            run_mission(&mut source, ticks, &common)
        }
        Commands::Report { blackbox, chart } => {
            let records = load_blackbox(&blackbox)?;
            print_analysis(&records, &CbfConfig::default(), chart);
            Ok(())
        }
    }
}

fn run_mission(source: &mut dyn TelemetrySource, ticks: usize, args: &MissionArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => CbfConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CbfConfig::default(),
    };

    println!("\n--- {} SYSTEM ONLINE ---", args.name);

    let mut session = FlightSession::new(&config);
    let mut blackbox = Blackbox::with_capacity(ticks);
    let pace = Duration::from_millis(args.tick_ms);

    session.fly(source, &mut blackbox, |outcome, snapshot| {
        if !args.quiet {
            println!("{}", render::tick_lines(outcome, snapshot));
        }
        if !pace.is_zero() {
            std::thread::sleep(pace);
        }
    });

    if let Some(path) = &args.blackbox {
        let file = File::create(path)
            .with_context(|| format!("creating blackbox {}", path.display()))?;
        let mut sink = JsonlSink::new(file);
        blackbox
            .drain_to(&mut sink)
            .with_context(|| format!("writing blackbox {}", path.display()))?;
        log::info!("blackbox: {} records -> {}", sink.written(), path.display());
    }

    println!("\n--- {} post-flight analysis ---", args.name);
    print_analysis(blackbox.records(), &config, args.chart);
    Ok(())
}

fn print_analysis(records: &[BlackboxRecord], config: &CbfConfig, chart: bool) {
    println!("{}", FlightReport::from_records(records));
    if chart {
        let trace = ScoreTrace {
            threshold: config.arbiter.fail_safe_below,
            ..Default::default()
        };
        println!("\n{}", trace.render(records));
    }
}

fn load_blackbox(path: &Path) -> Result<Vec<BlackboxRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let records = read_jsonl(BufReader::new(file))
        .with_context(|| format!("reading blackbox {}", path.display()))?;
    Ok(records)
}

fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
