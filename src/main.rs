mod config;
mod core;
mod frequency;
mod layout;
mod render;
mod rotation;
mod types;
mod ui;

use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    config::{InteractionMode, Settings},
    core::Session,
    render::CssSink,
};

#[derive(Parser)]
#[command(name = "wordsphere", about = "Rotating, frequency-weighted word sphere in the terminal")]
struct Cli {
    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pointer behaviour over the sphere
    #[arg(long, value_enum)]
    mode: Option<InteractionMode>,

    /// Start with an empty sphere instead of the sample words
    #[arg(long)]
    no_samples: bool,

    /// Seed for the auto-drift randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Print one frame as CSS declarations to stdout and exit
    #[arg(long)]
    dump_frame: bool,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(mode) = self.mode {
            settings.interaction_mode = mode;
        }
        if self.no_samples {
            settings.seed_samples = false;
        }
        if self.seed.is_some() {
            settings.rng_seed = self.seed;
        }
        Ok(settings)
    }
}

fn init_tracing(log_file: Option<&PathBuf>, verbose: bool) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn dump_frame(settings: &Settings, out: impl Write) -> Result<()> {
    let mut session = Session::new(settings, 0.0);
    session.set_viewport_size(config::DUMP_VIEWPORT_WIDTH, config::DUMP_VIEWPORT_HEIGHT);
    let mut sink = CssSink::new(out);
    session.tick(0.0, &mut sink);
    sink.finish().context("failed to write frame")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref(), cli.verbose)?;
    let settings = cli.settings()?;
    if cli.dump_frame {
        return dump_frame(&settings, io::stdout().lock());
    }
    ui::run(&settings)
}
