#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for inspecting load shapes.
//!
//! Configuration is read from the process environment exactly as a deployed
//! harness would read it, optionally overridden with `--set KEY=VALUE`.

use std::{ffi::OsString, io::Write, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use load_shape_engine::{ShapeEngine, TracingSink, MAX_PREVIEW_POINTS};
use load_shape_environment::{catalog, Environment};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod output;

/// Load shape inspection tool.
#[derive(Debug, Parser)]
#[command(name = "load-shape", version, about = "Preview and inspect load test traffic shapes")]
struct Cli {
    /// Log every tick and configuration decision.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override a configuration variable, as `KEY=VALUE`.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment, global = true)]
    overrides: Vec<(String, String)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tick the configured shape at a fixed cadence and print the targets.
    Preview {
        /// Seconds between ticks.
        #[arg(long, default_value_t = 1.0)]
        step: f64,
        /// Last run time to evaluate, in seconds.
        #[arg(long, default_value_t = 600.0)]
        horizon: f64,
        /// Noise seed; overrides `NOISE_SEED`.
        #[arg(long)]
        seed: Option<u64>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// List every shape with its parameter schema.
    Shapes {
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Show the recognised configuration variables currently set.
    Config,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

/// Entry point for the load shape command-line interface.
fn main() -> Result<()> {
    run(std::env::args_os(), Environment::from_process())
}

fn run<I, T>(args: I, environment: Environment) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_tracing(cli.verbose);

    let environment = environment.with_overrides(cli.overrides);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Preview {
            step,
            horizon,
            seed,
            format,
        } => {
            let (cadence, horizon) = preview_window(step, horizon)?;

            let config = environment
                .engine_config()
                .context("failed to load the load shape configuration")?;
            let seed = match seed {
                Some(seed) => Some(seed),
                None => environment.noise_seed().context("failed to read the noise seed")?,
            };
            let noise_percent = config.noise.percent();

            let mut engine = ShapeEngine::from_config(config, seed, TracingSink);
            let report = output::PreviewReport {
                shape: engine.kind(),
                noise_percent,
                seed,
                points: engine.preview(cadence, horizon),
            };
            debug!(
                shape = %report.shape,
                ticks = report.points.len(),
                terminated = engine.is_terminated(),
                "preview finished"
            );
            match format {
                Format::Table => output::write_preview_table(&mut out, &report)?,
                Format::Json => serde_json::to_writer_pretty(&mut out, &report)?,
            }
        }
        Command::Shapes { format } => {
            let shapes = catalog();
            match format {
                Format::Table => output::write_catalog_table(&mut out, &shapes)?,
                Format::Json => serde_json::to_writer_pretty(&mut out, &shapes)?,
            }
        }
        Command::Config => serde_json::to_writer_pretty(&mut out, &environment.snapshot())?,
    }

    writeln!(out)?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn preview_window(step: f64, horizon: f64) -> Result<(Duration, Duration)> {
    let cadence = Duration::try_from_secs_f64(step)
        .with_context(|| format!("invalid --step {step}"))?;
    let horizon = Duration::try_from_secs_f64(horizon)
        .with_context(|| format!("invalid --horizon {horizon}"))?;

    if !cadence.is_zero() {
        let points = horizon.as_secs_f64() / cadence.as_secs_f64();
        if points >= MAX_PREVIEW_POINTS as f64 {
            bail!("preview needs {points:.0} points, the limit is {MAX_PREVIEW_POINTS}");
        }
    }
    Ok((cadence, horizon))
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing variable name in `{raw}`"));
    }
    Ok((key.to_owned(), value.to_owned()))
}
