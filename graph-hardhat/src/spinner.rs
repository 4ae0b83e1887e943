//! Progress spinner with persisted steps, in the style of graph-cli.
//!
//! When stderr is not a terminal the spinner is hidden and steps and warnings
//! go through the logger instead.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct Spinner {
    bar: ProgressBar,
    warnings: Vec<String>,
}

impl Spinner {
    fn start(text: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(text.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            warnings: Vec::new(),
        }
    }

    /// Persists a step below the spinner.
    pub fn step(&self, subject: &str) {
        if self.bar.is_hidden() {
            log::info!("{}", subject);
        } else {
            self.bar.println(format!("  {}", subject));
        }
    }

    /// Reports a warning. The spinner finishes with the warning text once
    /// the operation completes.
    pub fn warn(&mut self, message: &str) {
        if self.bar.is_hidden() {
            log::warn!("{}", message);
        } else {
            self.bar.println(format!("⚠ {}", message));
        }
        self.warnings.push(message.to_owned());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn finish(&self, symbol: &str, text: &str) {
        self.bar.finish_and_clear();
        if self.bar.is_hidden() {
            log::info!("{}", text);
        } else {
            eprintln!("{} {}", symbol, text);
        }
    }
}

/// Runs an operation behind a spinner.
///
/// The spinner finishes with `text` on success, with `warning_text` when the
/// operation reported warnings, and with `error_text` when it failed. Errors
/// are passed through unchanged.
pub fn with_spinner<T, F>(text: &str, error_text: &str, warning_text: &str, f: F) -> Result<T>
where
    F: FnOnce(&mut Spinner) -> Result<T>,
{
    let mut spinner = Spinner::start(text);
    match f(&mut spinner) {
        Ok(value) => {
            if spinner.warnings().is_empty() {
                spinner.finish("✔", text);
            } else {
                spinner.finish("⚠", warning_text);
            }
            Ok(value)
        }
        Err(err) => {
            spinner.finish("✖", error_text);
            Err(err)
        }
    }
}
