//! # Model Output Parser
//!
//! Turns the semi-structured text a vision model returns into item signals.
//! The expected shape is the one requested by
//! [`crate::prompts::build_analysis_prompt`]:
//!
//! ```text
//! **Found Items:**
//! * cat [0.92] (asleep on the sofa)
//! **Maybe Found Item:**
//! * dog [0.40]
//! ```
//!
//! Models do not always follow instructions. Lines outside any category are
//! skipped, bullets without a readable confidence keep `confidence: None`, and
//! nothing is invented for queried items the model never mentions.

use crate::types::{ItemQuery, ItemSignal};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\*\*(found|maybe found|not found) items?:\*\*").expect("valid header regex")
});

static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\s*(.*?)(?:\s*\((.*?)\))?$").expect("valid item regex"));

static CONFIDENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*?)\s*\[\s*(?:confidence\s*[:=]?\s*)?([^\]]*?)\s*\]$")
        .expect("valid confidence regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Found,
    MaybeFound,
    NotFound,
}

impl Section {
    fn from_header(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "found" => Some(Section::Found),
            "maybe found" => Some(Section::MaybeFound),
            "not found" => Some(Section::NotFound),
            _ => None,
        }
    }
}

/// Signals grouped by the section header they appeared under.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedOutput {
    pub found: Vec<ItemSignal>,
    pub maybe_found: Vec<ItemSignal>,
    pub not_found: Vec<ItemSignal>,
}

impl ParsedOutput {
    fn section_mut(&mut self, section: Section) -> &mut Vec<ItemSignal> {
        match section {
            Section::Found => &mut self.found,
            Section::MaybeFound => &mut self.maybe_found,
            Section::NotFound => &mut self.not_found,
        }
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.found
            .iter()
            .chain(&self.maybe_found)
            .chain(&self.not_found)
            .map(|s| s.name.as_str())
    }

    /// Queried items the model never mentioned, compared case-insensitively.
    pub fn unmentioned<'q>(&self, queried: &'q ItemQuery) -> Vec<&'q str> {
        queried
            .items()
            .iter()
            .filter(|q| !self.names().any(|name| name.eq_ignore_ascii_case(q)))
            .map(String::as_str)
            .collect()
    }
}

/// Reads a confidence value such as `0.85`, `.9` or `85%`.
fn parse_confidence(text: &str) -> Option<f64> {
    let text = text.trim();
    let value = match text.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().ok()? / 100.0,
        None => text.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Splits a trailing `[confidence]` off `text`.
fn split_confidence(text: &str) -> (&str, Option<f64>) {
    match CONFIDENCE_RE.captures(text) {
        Some(caps) => {
            let rest = caps.get(1).map_or("", |m| m.as_str());
            let confidence = caps.get(2).and_then(|m| parse_confidence(m.as_str()));
            (rest, confidence)
        }
        None => (text, None),
    }
}

fn parse_item(line: &str) -> Option<ItemSignal> {
    // A confidence may follow the detail instead of preceding it.
    let (line, trailing_confidence) = split_confidence(line);
    let caps = ITEM_RE.captures(line)?;
    let (name, confidence) = split_confidence(caps.get(1).map_or("", |m| m.as_str()));
    let name = name.trim();

    let detail = caps
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|d| !d.is_empty())
        .map(String::from);

    let confidence = confidence.or(trailing_confidence);
    // A bare `*` carries nothing; an unnamed bullet with a value is kept.
    if name.is_empty() && confidence.is_none() && detail.is_none() {
        return None;
    }

    Some(ItemSignal {
        name: name.to_string(),
        confidence,
        detail,
    })
}

/// Parses raw model output into per-section item signals.
pub fn parse_model_output(raw_text: &str) -> ParsedOutput {
    debug!("Raw model output to parse:\n{}", raw_text);

    let mut parsed = ParsedOutput::default();
    let mut current: Option<Section> = None;

    for line in raw_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = HEADER_RE.captures(line) {
            current = caps.get(1).and_then(|m| Section::from_header(m.as_str()));
            debug!("Switched to section: {:?}", current);
            continue;
        }

        let Some(section) = current else {
            debug!("Line not processed (no current section): '{}'", line);
            continue;
        };

        match parse_item(line) {
            Some(signal) => parsed.section_mut(section).push(signal),
            None => debug!("Line under {:?} did not match item pattern: '{}'", section, line),
        }
    }

    info!(
        "Parsed items - Found: {}, Maybe: {}, Not Found: {}",
        parsed.found.len(),
        parsed.maybe_found.len(),
        parsed.not_found.len()
    );
    parsed
}
