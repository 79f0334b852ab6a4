//! # Fret Template Entry Point
//!
//! Loads a tuning config, cuts the fret layout into pages and writes one SVG per page.
//! `--stdout` prints an ASCII preview instead, for checking a config without
//! producing files.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use clap::Parser;
use fret_template_lib::config::{Config, Paper};
use fret_template_lib::output::{generate, OutputPlan};
use fret_template_lib::renderer::draw_ascii;
use fret_template_lib::{plan_pages, PageMode};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fret-template")]
#[command(version, about = "Printable fret templates for any EDO, overlaid on 12-EDO")]
struct Cli {
    /// Tuning config file (.json or .toml)
    config: PathBuf,

    /// Output directory (default: <config dir>/<config stem>_frets)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Device pixels per inch
    #[arg(long)]
    dpi: Option<f64>,

    /// Paper size: letter, legal or a4
    #[arg(long)]
    paper: Option<Paper>,

    /// Page margin in inches
    #[arg(long)]
    margin: Option<f64>,

    /// Draw the whole fretboard on one tall page
    #[arg(long)]
    single_page: bool,

    /// Print an ASCII preview instead of writing SVG files
    #[arg(long)]
    stdout: bool,
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the ASCII preview on stdout stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    run(&cli, &mut std::io::stdout().lock())
}

/// Load the config named on the command line and apply the layout options on top.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load_from_path(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config.layout = config
        .layout
        .with_overrides(cli.dpi, cli.paper, cli.margin)
        .context("applying layout options")?;
    Ok(config)
}

/// Everything after argument parsing. Any error here exits with status 1.
fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let config = load_config(cli)?;

    let mode = if cli.single_page {
        PageMode::Single
    } else {
        PageMode::Paginated
    };

    // Development mode: ASCII output for checking a config
    if cli.stdout {
        let pages = plan_pages(&config.tuning, &config.layout, mode)?;
        write!(out, "{}", draw_ascii(&pages, &config.tuning))?;
        return Ok(());
    }

    let plan = OutputPlan::for_config(&cli.config, cli.out_dir.as_deref())?;
    let written = generate(&config, mode, &plan)?;
    for path in &written {
        writeln!(out, "Template saved as {}", path.display())?;
    }

    Ok(())
}
