//! Console styling helpers

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark used for completed steps
pub const CHECK: &str = "✓";

/// Semantic colors for console output
pub trait Stylize: Display {
    /// De-emphasized detail
    fn muted(&self) -> String {
        self.to_string().dimmed().to_string()
    }

    /// Names of branches, PRs, and remotes
    fn accent(&self) -> String {
        self.to_string().cyan().to_string()
    }

    /// Headings
    fn emphasis(&self) -> String {
        self.to_string().bold().to_string()
    }

    /// Good news
    fn success(&self) -> String {
        self.to_string().green().to_string()
    }

    /// Something needs attention
    fn warn(&self) -> String {
        self.to_string().yellow().to_string()
    }

    /// Something failed
    fn error(&self) -> String {
        self.to_string().red().to_string()
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Arrow between branch names
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner shown while waiting on GitHub
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

/// Render `text` as a clickable link when the terminal supports it
pub fn hyperlink(text: &str, url: &str) -> String {
    if url.is_empty() || !supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        return text.to_string();
    }
    terminal_link::Link::new(text, url).to_string()
}
