use std::path::PathBuf;

use clap::Parser;

use crate::models::SourceKind;

#[derive(Parser, Debug)]
#[command(
    name = "riskread",
    about = "Extract ingredients from label text and classify their safety",
    version
)]
pub struct Cli {
    /// Ingredient label text; use `-` to read stdin
    pub text: Option<String>,

    /// Read label text from a file
    #[arg(long, value_name = "PATH", conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Label photo to recognize (repeatable, e.g. front and back)
    #[arg(long, value_name = "PATH")]
    pub image: Vec<PathBuf>,

    /// Treat typed text as already-recognized label text
    #[arg(long, value_name = "KIND", default_value = "typed")]
    pub source: SourceArg,

    /// Classify an ingredient name directly, skipping extraction (repeatable)
    #[arg(long, value_name = "NAME")]
    pub ingredient: Vec<String>,

    /// Config file [default: ./.riskread/config.toml, fallback ~/.config/riskread/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Statistical model artifact (overrides `model.path` in config)
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to riskread-report.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "riskread-report.pdf")]
    pub pdf: Option<PathBuf>,

    /// Exit with code 2 when any ingredient is harmful
    #[arg(long)]
    pub fail_on_harmful: bool,

    /// Show all ingredients (not just harmful/controversial)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SourceArg {
    Typed,
    Image,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Typed => SourceKind::Typed,
            SourceArg::Image => SourceKind::Image,
        }
    }
}
