#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line host for the heritage map game.

mod catalog;
mod ledger;
mod output;
mod play;

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use heritage_map_core::{
    ArchaeologicalObject, AwardRequest, GameVariant, SessionConfig, DEFAULT_ROUND_SECONDS,
};
use heritage_map_session::GameSession;
use heritage_map_system_classifier::classify;
use heritage_map_system_markers::build_markers;
use heritage_map_system_scoring::{PointsLedger, ScoreReporter};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{ledger::JsonLinesLedger, play::WallClock};

/// Find archaeological sites of Kazakhstan on the map.
#[derive(Debug, Parser)]
#[command(name = "heritage-map", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the aggregated region markers for a catalog.
    Markers {
        /// JSON catalog to read instead of the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Resolve free-text region names to canonical regions.
    Classify {
        /// Region names to classify.
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Play a timed round in the terminal.
    Play {
        /// JSON catalog to read instead of the built-in one.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Game variant, which selects the bonus time and ledger action type.
        #[arg(long, value_enum, default_value_t = Variant::Map)]
        variant: Variant,
        /// Initial length of the round in seconds.
        #[arg(long, default_value_t = DEFAULT_ROUND_SECONDS)]
        round_seconds: u32,
        /// Seconds added per correct answer; defaults to the variant's bonus.
        #[arg(long)]
        bonus_seconds: Option<u32>,
        /// Seed for the object order; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// JSON-lines file receiving point awards.
        #[arg(long)]
        ledger: Option<PathBuf>,
        /// User credited in the ledger.
        #[arg(long, default_value = "guest")]
        user: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Variant {
    Map,
    Quiz,
}

impl From<Variant> for GameVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Map => GameVariant::Map,
            Variant::Quiz => GameVariant::Quiz,
        }
    }
}

/// Entry point for the heritage map command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("heritage_map=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Markers { catalog, format } => print_markers(catalog.as_deref(), format),
        Commands::Classify { names } => print_classification(&names),
        Commands::Play {
            catalog,
            variant,
            round_seconds,
            bonus_seconds,
            seed,
            ledger,
            user,
        } => {
            let variant = GameVariant::from(variant);
            let mut config = SessionConfig::for_variant(variant).with_round_seconds(round_seconds);
            if let Some(bonus_seconds) = bonus_seconds {
                config = config.with_bonus_seconds(bonus_seconds);
            }
            run_round(catalog.as_deref(), config, seed, ledger.as_deref(), user)
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Vec<ArchaeologicalObject>> {
    match path {
        Some(path) => {
            let objects = catalog::load(path)?;
            info!(path = %path.display(), objects = objects.len(), "catalog loaded");
            Ok(objects)
        }
        None => Ok(catalog::builtin()),
    }
}

fn print_markers(path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let objects = load_catalog(path)?;
    let markers = build_markers(&objects);
    let text = match format {
        OutputFormat::Text => output::format_markers(&markers),
        OutputFormat::Json => {
            output::format_markers_json(&markers).context("failed to encode markers")?
        }
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text.trim_end())?;
    Ok(())
}

fn print_classification(names: &[String]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for name in names {
        writeln!(stdout, "{}\t{}", classify(name), name)?;
    }
    Ok(())
}

fn run_round(
    path: Option<&Path>,
    config: SessionConfig,
    seed: Option<u64>,
    ledger_path: Option<&Path>,
    user: String,
) -> Result<()> {
    let mut objects = load_catalog(path)?;
    let seed = seed.unwrap_or_else(rand::random::<u64>);
    debug!(seed, "shuffling catalog");
    catalog::shuffle(&mut objects, seed);

    let mut ledger: Box<dyn PointsLedger> = match ledger_path {
        Some(path) => Box::new(
            JsonLinesLedger::open(path, user)
                .with_context(|| format!("failed to open ledger {}", path.display()))?,
        ),
        None => Box::new(Vec::<AwardRequest>::new()),
    };

    let mut game = GameSession::new(objects, config);
    let mut reporter = ScoreReporter::new(config.variant);
    let mut clock = WallClock::start();
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    let snapshot = play::play_round(
        &mut game,
        &mut reporter,
        &mut *ledger,
        &mut clock,
        &mut stdin,
        &mut stdout,
    )?;
    info!(
        score = snapshot.score,
        submitted = reporter.submitted(),
        failed = reporter.failed(),
        "session closed"
    );
    Ok(())
}
