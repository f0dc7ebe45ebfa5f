use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use webpinator::{Config, RunConfig, RunSummary, WebpCodec, Webpinator};

use crate::terminal::TerminalObserver;

mod terminal;

fn main() -> ExitCode {
    let config = Config::new();
    init_tracing(&config);

    terminal::banner();

    match run(&config) {
        Ok(summary) => {
            terminal::summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            terminal::fatal(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Config) -> Result<RunSummary> {
    let cwd = std::env::current_dir().context("Failed to read the current working directory")?;
    let (config, quality_fallback) = RunConfig::resolve(args, &cwd);
    if let Some(fallback) = quality_fallback {
        terminal::warning(fallback);
    }
    debug!("Resolved configuration: {:?}", config);

    let mut observer = TerminalObserver::new()?;
    let summary = Webpinator::new(WebpCodec::new(), config).run(&mut observer)?;
    observer.finish();

    Ok(summary)
}

fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
