//! CLI presenter for output formatting
//!
//! Owns the status surface (stderr) and the visible chat log (stdout).
//! Backend-supplied text passes through a control-character sanitizer
//! before it reaches the terminal.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::chat::Sender;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Update the status surface.
    /// Replaces any active spinner message; otherwise prints a status line.
    pub fn status(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        } else {
            eprintln!("{} {}", "●".cyan(), message);
        }
    }

    /// Update the status surface with the recording indicator
    pub fn status_recording(&self, message: &str) {
        eprintln!("{} {}", "●".red(), message);
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Stop the spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Append an entry to the visible chat log
    pub fn chat_entry(&self, sender: Sender, text: &str) {
        let label = match sender {
            Sender::You => sender.label().cyan().bold(),
            Sender::Ai => sender.label().green().bold(),
        };
        let line = format!("{}: {}", label, sanitize(text));
        if let Some(ref spinner) = self.spinner {
            spinner.println(line);
        } else {
            println!("{}", line);
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Output text to stdout (machine-readable command output)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip terminal control characters from backend-supplied text.
///
/// The backend is trusted to supply chat text, not terminal input; escape
/// sequences and other C0/C1 controls are dropped so a reply can never
/// rewrite the screen. Newlines and tabs survive.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_passes_plain_text() {
        assert_eq!(sanitize("hello world"), "hello world");
    }

    #[test]
    fn sanitize_keeps_newlines_and_tabs() {
        assert_eq!(sanitize("a\nb\tc"), "a\nb\tc");
    }

    #[test]
    fn sanitize_strips_escape_sequences() {
        assert_eq!(sanitize("\x1b[2Jhi\x1b[0m"), "[2Jhi[0m");
    }

    #[test]
    fn sanitize_strips_carriage_return_and_bell() {
        assert_eq!(sanitize("hi\r\x07there"), "hithere");
    }

    #[test]
    fn sanitize_keeps_unicode() {
        assert_eq!(sanitize("héllo 世界 🎤"), "héllo 世界 🎤");
    }
}
