use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "veritas-server")]
#[command(author, version, about = "REAL/FAKE news classification API", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "VERITAS_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long, env = "VERITAS_LISTEN")]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "VERITAS_PORT")]
    pub port: Option<u16>,

    /// Vectorizer artifact path
    #[arg(long, env = "VERITAS_VECTORIZER")]
    pub vectorizer: Option<PathBuf>,

    /// Classifier artifact path
    #[arg(short, long, env = "VERITAS_MODEL")]
    pub model: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
