//! Styled console output. The library never prints; everything a user sees
//! goes through here.

use std::fmt::Display;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use webpinator::{ConversionResult, DiscoveredImage, RunConfig, RunObserver, RunSummary};

pub fn banner() {
    println!("{}", style("webpinator").cyan().bold());
}

pub fn warning(message: impl Display) {
    eprintln!("{}", style(format!("Warning: {}", message)).yellow());
}

pub fn fatal(error: &anyhow::Error) {
    eprintln!("{}", style(format!("{:#}", error)).red().bold());
}

pub fn summary(summary: &RunSummary) {
    println!("{}", style(summary).green().bold());
}

/// Prints the run header and drives a progress bar over the images.
pub struct TerminalObserver {
    style: ProgressStyle,
    progress_bar: Option<ProgressBar>,
}

impl TerminalObserver {
    pub fn new() -> Result<Self> {
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )?
        .progress_chars("#>-");

        Ok(Self {
            style,
            progress_bar: None,
        })
    }

    pub fn finish(&mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}

impl RunObserver for TerminalObserver {
    fn run_started(&mut self, config: &RunConfig, image_count: usize) {
        println!(
            "{}",
            style(format!(
                "Converting all image files in \"{}\" to WEBP in \"{}\" with quality {}",
                style(config.input_dir.display()).bold(),
                style(config.output_dir.display()).bold(),
                style(config.quality).bold()
            ))
            .blue()
        );
        println!(
            "{}",
            style(format!("Found {} image files", image_count)).blue().bold()
        );

        let progress_bar = ProgressBar::new(image_count as u64);
        progress_bar.set_style(self.style.clone());
        self.progress_bar = Some(progress_bar);
    }

    fn image_started(&mut self, image: &DiscoveredImage) {
        if let Some(progress_bar) = &self.progress_bar {
            progress_bar.set_message(format!("Processing \"{}\"", image.file_name()));
        }
    }

    fn image_finished(&mut self, result: &ConversionResult) {
        let report = || {
            if let Some(error) = &result.error {
                eprintln!(
                    "{} {}",
                    style(format!("Error occurred on \"{}\":", result.file_name())).red(),
                    error
                );
            }
        };

        match &self.progress_bar {
            Some(progress_bar) => {
                progress_bar.suspend(report);
                progress_bar.inc(1);
            }
            None => report(),
        }
    }
}

impl Drop for TerminalObserver {
    fn drop(&mut self) {
        self.finish();
    }
}
