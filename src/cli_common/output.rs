//! Запись результатов вставки

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

use crate::core::config::{OutputFormat, OutputSettings};
use crate::insertion::InsertionStats;
use crate::tree::{DerivationTree, ParseTree};

/// JSON-представление одного прогона
#[derive(Debug, Serialize)]
pub struct InsertionReport {
    pub results: Vec<ReportEntry>,
    pub stats: ReportStats,
}

#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub text: String,
    pub tree: ParseTree,
}

#[derive(Debug, Serialize)]
pub struct ReportStats {
    pub candidates: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub extensions: usize,
    pub emitted: usize,
}

impl From<InsertionStats> for ReportStats {
    fn from(s: InsertionStats) -> Self {
        Self {
            candidates: s.candidates,
            rejected: s.rejected,
            duplicates: s.duplicates,
            extensions: s.extensions,
            emitted: s.emitted,
        }
    }
}

impl InsertionReport {
    pub fn new(results: &[DerivationTree], stats: InsertionStats, show_open: bool) -> Self {
        Self {
            results: results
                .iter()
                .map(|t| ReportEntry { text: t.render(show_open), tree: t.to_parse_tree() })
                .collect(),
            stats: stats.into(),
        }
    }
}

/// Writer для вывода результатов
pub struct OutputWriter {
    writer: Box<dyn Write>,
    settings: OutputSettings,
}

impl OutputWriter {
    /// Создает writer для stdout
    pub fn stdout(settings: OutputSettings) -> Self {
        Self { writer: Box::new(io::stdout()), settings }
    }

    pub fn new(writer: Box<dyn Write>, settings: OutputSettings) -> Self {
        Self { writer, settings }
    }

    pub fn write_results(&mut self, results: &[DerivationTree], stats: InsertionStats) -> Result<()> {
        match self.settings.format {
            OutputFormat::Json => {
                let report = InsertionReport::new(results, stats, self.settings.show_open);
                writeln!(self.writer, "{}", serde_json::to_string_pretty(&report)?)?;
            }
            OutputFormat::Text => {
                for tree in results {
                    writeln!(self.writer, "{}", tree.render(self.settings.show_open))?;
                }
            }
        }
        Ok(())
    }

    /// Записывает список символов
    pub fn write_symbols<'a, I>(&mut self, header: &str, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let symbols: Vec<&str> = symbols.into_iter().collect();
        match self.settings.format {
            OutputFormat::Json => {
                writeln!(self.writer, "{}", serde_json::to_string(&symbols)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.writer, "{}", header.bold().blue())?;
                for s in symbols {
                    writeln!(self.writer, "  • {}", s)?;
                }
            }
        }
        Ok(())
    }
}
