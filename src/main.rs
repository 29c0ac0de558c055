//! `riskread`: extract ingredients from label text and classify their safety.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and build the classifier
//!    ([`classify::IngredientClassifier`]) once, with the optional model.
//! 3. Obtain label text: typed argument, file, stdin, or recognized images
//!    ([`recognizer`]).
//! 4. Extract and classify ingredients ([`pipeline`]).
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0`, `1` (no input / no ingredients) or `2` (harmful ingredient
//!    with `--fail-on-harmful`).

mod classify;
mod cli;
mod config;
mod models;
mod pipeline;
mod recognizer;
mod report;
mod text;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use classify::model::LinearTokenModel;
use classify::IngredientClassifier;
use cli::{Cli, ReportFormat};
use config::load_config;
use models::{AnalysisReport, RawText};
use pipeline::{Outcome, Pipeline};
use recognizer::Recognizer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut config = load_config(&cwd, cli.config.as_deref())?;

    let mut classifier = IngredientClassifier::new(config.rule_tables()?);
    if let Some(path) = cli.model.as_ref().or(config.model.path.as_ref()) {
        let model = LinearTokenModel::load(path)
            .with_context(|| format!("failed to load model {}", path.display()))?;
        info!(path = %path.display(), vocabulary = model.vocabulary_size(), "model loaded");
        classifier = classifier.with_model(Box::new(model));
    }

    info!(model = classifier.has_model(), "classifier ready");

    let pipeline = Pipeline::new(&classifier, config.pipeline.clone())?;

    let outcome = if !cli.ingredient.is_empty() {
        pipeline.analyze_names(&cli.ingredient)
    } else {
        let raw = read_input(&cli, &config.ocr).await?;
        pipeline.analyze(&raw)
    };

    let report = match outcome {
        Outcome::Report(report) => report,
        Outcome::NoInput => {
            eprintln!(
                "{} Please enter ingredients or provide a label image for analysis.",
                "No input provided.".red().bold()
            );
            std::process::exit(1);
        }
        Outcome::NoIngredients => {
            eprintln!(
                "{} Please try again with clearer input.",
                "No ingredients found.".red().bold()
            );
            std::process::exit(1);
        }
    };

    // --pdf implies PDF format
    let report_format = match &cli.pdf {
        Some(_) => ReportFormat::Pdf,
        None => cli.report.clone(),
    };
    let pdf_path = cli
        .pdf
        .clone()
        .unwrap_or_else(|| PathBuf::from("riskread-report.pdf"));

    render(&report, &report_format, &pdf_path, cli.verbose, cli.quiet)?;

    if cli.fail_on_harmful && report.stats.harmful > 0 {
        std::process::exit(2);
    }

    Ok(())
}

/// Typed text wins over recognized text when both are given.
async fn read_input(cli: &Cli, ocr: &config::OcrConfig) -> Result<RawText> {
    let typed = match (&cli.text, &cli.file) {
        (Some(text), _) if text == "-" => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Some(buf)
        }
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        (None, None) => None,
    };

    if let Some(text) = typed.filter(|t| !t.trim().is_empty()) {
        return Ok(RawText::new(text, cli.source.into()));
    }

    if cli.image.is_empty() {
        return Ok(RawText::new(String::new(), cli.source.into()));
    }

    let recognizer = Recognizer::new(ocr);
    let spinner = (!cli.quiet).then(|| recognition_spinner(&cli.image));
    let text = recognizer.recognize_all(&cli.image).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    Ok(RawText::recognized(text))
}

fn recognition_spinner(images: &[PathBuf]) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!(
        "Recognizing {} image{}",
        images.len(),
        if images.len() == 1 { "" } else { "s" }
    ));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn render(
    report: &AnalysisReport,
    format: &ReportFormat,
    pdf_path: &Path,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    match format {
        ReportFormat::Terminal => report::terminal::render(report, verbose, quiet),
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
            Ok(())
        }
        ReportFormat::Pdf => report::pdf::render(report, pdf_path),
    }
}
