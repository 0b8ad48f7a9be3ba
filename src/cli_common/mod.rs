//! Общий модуль для CLI
//!
//! Содержит функциональность, используемую бинарником `grafter`:
//! - Инициализация логирования
//! - Цветной вывод сообщений
//! - Запись результатов вставки в text/json

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod output;

pub use args::{CommonArgs, GrammarArgs};
pub use output::{InsertionReport, OutputWriter};

/// Инициализирует систему логирования
///
/// `RUST_LOG` дополняет уровень, выбранный флагом `--verbose`.
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Выводит успешное завершение операции
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✅".green(), message.green());
}

/// Выводит предупреждение
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠️".yellow(), message.yellow());
}

/// Выводит ошибку
pub fn print_error(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red());
}

/// Выводит информационное сообщение
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ️".blue(), message);
}

/// Проверяет существование входного файла
pub fn validate_path(path: &Path, description: &str) -> Result<()> {
    if !path.is_file() {
        return Err(anyhow::anyhow!(
            "{} does not exist: {}",
            description,
            path.display()
        ));
    }
    Ok(())
}

/// Форматирует продолжительность в человекочитаемый вид
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else {
        format!("{}.{:03}s", secs, millis)
    }
}
