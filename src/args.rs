use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "formmate-fill")]
#[command(about = "Auto-fills web forms from a per-user knowledge base")]
#[command(version)]
pub struct Args {
    /// URL of the form to fill
    pub url: String,

    /// User id to fill for (overrides the stored credential)
    #[arg(long)]
    pub uid: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend base URL; may be repeated to add fallbacks
    #[arg(long = "backend-url")]
    pub backend_urls: Vec<String>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Backend request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Extract and match only; do not write into the page
    #[arg(long)]
    pub dry_run: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    pub output: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Per-field lines plus a one-line summary
    Summary,
    /// The full report as JSON
    Json,
}
