//! `codebase-expr` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** — command-line flags via [`args::Cli`].
//! 2. **Wire observability** — configure `tracing-subscriber` with an
//!    `EnvFilter` (from `RUST_LOG`, else `--log-level`) and either a plain or
//!    a JSON formatting layer. Events emitted by the `expressions` crate flow
//!    through it.
//! 3. **Build and print** — construct the requested expression and print its
//!    canonical string, or the tree as JSON with `--format json`.

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::args::{Cli, OutputFormat};

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let expr = cli.command.build().context("invalid expression arguments")?;
    tracing::debug!(expression = %expr, depth = expr.depth(), "built expression");

    match cli.format {
        OutputFormat::Text => println!("{expr}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&expr).context("serializing expression")?;
            println!("{json}");
        }
    }
    Ok(())
}
