//! # Terminal Presenter
//!
//! Renders analysis progress and results as plain text.

use spotter::{
    presenter::{empty_bucket_placeholder, ResultPresenter, NO_ITEMS_QUERIED},
    types::{CategorizedResult, ItemSignal},
};
use std::fmt::Write as _;
use std::io::Write;

/// A [`ResultPresenter`] that writes to any `io::Write`, usually stdout.
pub struct TerminalPresenter<W: Write> {
    out: W,
    loading: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        // A closed stdout is not worth failing the analysis over.
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl<W: Write> ResultPresenter for TerminalPresenter<W> {
    fn set_loading(&mut self, loading: bool) {
        if loading && !self.loading {
            self.emit("Analyzing image...\n");
        }
        self.loading = loading;
    }

    fn clear(&mut self) {
        // Printed lines cannot be taken back; a new result simply follows.
    }

    fn show_result(&mut self, result: &CategorizedResult) {
        let text = render_result(result);
        self.emit(&text);
    }

    fn show_error(&mut self, message: &str) {
        self.emit(&format!("Analysis failed: {message}\n"));
    }
}

fn render_signal(signal: &ItemSignal) -> String {
    match &signal.detail {
        Some(detail) => format!("{} - Details: {}", signal.name, detail),
        None => signal.name.clone(),
    }
}

fn render_bucket(out: &mut String, title: &str, category: &str, signals: &[ItemSignal]) {
    let _ = writeln!(out, "{title}:");
    if signals.is_empty() {
        let _ = writeln!(out, "  {}", empty_bucket_placeholder(category));
    }
    for signal in signals {
        let _ = writeln!(out, "  * {}", render_signal(signal));
    }
    out.push('\n');
}

/// Formats a categorized result the way the terminal shows it.
pub fn render_result(result: &CategorizedResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Queried Items:");
    match result.queried_items_echoed.as_deref() {
        Some(items) if !items.is_empty() => {
            for echoed in items {
                match &echoed.details {
                    Some(details) => {
                        let _ = writeln!(out, "  * {} ({})", echoed.item, details);
                    }
                    None => {
                        let _ = writeln!(out, "  * {}", echoed.item);
                    }
                }
            }
        }
        _ => {
            let _ = writeln!(out, "  {NO_ITEMS_QUERIED}");
        }
    }
    out.push('\n');

    render_bucket(&mut out, "Found Items", "Found", &result.found);
    render_bucket(&mut out, "Maybe Found Items", "Maybe Found", &result.maybe_found);
    render_bucket(&mut out, "Not Found Items", "Not Found", &result.not_found);
    if !result.unparsed_or_other.is_empty() {
        render_bucket(
            &mut out,
            "Unparsed / Other",
            "Unparsed / Other",
            &result.unparsed_or_other,
        );
    }

    let _ = writeln!(out, "Raw Output:");
    if result.raw_output.is_empty() {
        let json = serde_json::to_string_pretty(result).unwrap_or_default();
        let _ = writeln!(out, "{json}");
    } else {
        let _ = writeln!(out, "{}", result.raw_output.trim_end());
    }

    out
}
