//! Общие аргументы командной строки

use clap::Parser;
use std::path::PathBuf;

use crate::core::config::OutputFormat;

/// Общие аргументы для всех подкоманд
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format (text, json); overrides the config file
    #[arg(long, value_parser = parse_output_format)]
    pub format: Option<OutputFormat>,

    /// Configuration file (.toml or .yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Грамматика, с которой работает подкоманда
#[derive(Parser, Debug, Clone)]
pub struct GrammarArgs {
    /// Grammar JSON file
    #[arg(short, long)]
    pub grammar: PathBuf,
}

pub fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "text" | "txt" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!("Unknown output format: {}", other)),
    }
}
