//! # Shared Data Model
//!
//! Value types exchanged between the client core, the HTTP server, and the
//! inference service. Field names follow the JSON wire format of the
//! `/upload`, `/models`, and `/analyze` endpoints.

use crate::errors::AnalysisError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// An opaque reference to a previously uploaded image, as returned by `/upload`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadReference(String);

impl UploadReference {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The ordered item names an analysis should search for.
///
/// Empty and whitespace-only entries are never present. Duplicates are kept.
/// An empty query asks the inference service to pick notable items itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemQuery(Vec<String>);

impl ItemQuery {
    /// Splits comma-separated text into trimmed, non-empty item names.
    pub fn from_raw_text(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn items(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for ItemQuery {
    fn from(items: Vec<String>) -> Self {
        Self(
            items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        )
    }
}

/// The two confidence cut points used by the categorizer.
///
/// Values are expected in `[0, 1]` with `maybe_low <= found_low`, but neither
/// property is enforced. `NaN` is a legal value; it serializes as JSON `null`
/// and a `null` on the wire deserializes back to `NaN`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(deserialize_with = "nan_if_null")]
    pub found_low: f64,
    #[serde(deserialize_with = "nan_if_null")]
    pub maybe_low: f64,
}

fn nan_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl ThresholdConfig {
    pub fn new(found_low: f64, maybe_low: f64) -> Self {
        Self {
            found_low,
            maybe_low,
        }
    }

    /// Parses threshold text the way a form field would: anything that is not
    /// a number becomes `NaN` instead of an error or an invented default.
    pub fn parse_lenient(found_low: &str, maybe_low: &str) -> Self {
        let parse = |text: &str| text.trim().parse::<f64>().unwrap_or(f64::NAN);
        Self::new(parse(found_low), parse(maybe_low))
    }

    pub fn is_finite(&self) -> bool {
        self.found_low.is_finite() && self.maybe_low.is_finite()
    }

    /// An explicit, optional pre-check. It reports anomalies without changing
    /// how [`categorize`](crate::categorize::categorize) treats the values.
    pub fn validate(&self) -> Vec<AnalysisError> {
        let mut problems = Vec::new();
        if !self.found_low.is_finite() {
            problems.push(AnalysisError::InvalidThreshold {
                name: "found_low",
                value: self.found_low,
            });
        }
        if !self.maybe_low.is_finite() {
            problems.push(AnalysisError::InvalidThreshold {
                name: "maybe_low",
                value: self.maybe_low,
            });
        }
        if self.maybe_low > self.found_low {
            problems.push(AnalysisError::InvertedThresholds {
                found_low: self.found_low,
                maybe_low: self.maybe_low,
            });
        }
        problems
    }
}

impl PartialEq for ThresholdConfig {
    fn eq(&self, other: &Self) -> bool {
        let same = |a: f64, b: f64| a == b || (a.is_nan() && b.is_nan());
        same(self.found_low, other.found_low) && same(self.maybe_low, other.maybe_low)
    }
}

/// A single analysis attempt. Built by [`crate::request::build`] and never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub image_path: UploadReference,
    pub model: String,
    pub custom_items: ItemQuery,
    pub thresholds: ThresholdConfig,
}

/// One item reported by the inference service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemSignal {
    #[serde(rename = "item")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(rename = "details", default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ItemSignal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            confidence: None,
            detail: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// The confidence, if it is present and finite.
    pub fn usable_confidence(&self) -> Option<f64> {
        self.confidence.filter(|c| c.is_finite())
    }
}

/// An item the service confirms it evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoedItem {
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// The success body of `POST /analyze`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub raw_output: String,
    #[serde(default)]
    pub queried_items_echoed: Option<Vec<EchoedItem>>,
    #[serde(default)]
    pub found: Vec<ItemSignal>,
    #[serde(default)]
    pub maybe_found: Vec<ItemSignal>,
    #[serde(default)]
    pub not_found: Vec<ItemSignal>,
}

impl AnalysisResponse {
    /// Every reported signal, in `found`, `maybe_found`, `not_found` order.
    pub fn signals(&self) -> impl Iterator<Item = &ItemSignal> {
        self.found
            .iter()
            .chain(self.maybe_found.iter())
            .chain(self.not_found.iter())
    }
}

/// The categorizer's output for one completed analysis.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CategorizedResult {
    pub found: Vec<ItemSignal>,
    pub maybe_found: Vec<ItemSignal>,
    pub not_found: Vec<ItemSignal>,
    pub unparsed_or_other: Vec<ItemSignal>,
    pub queried_items_echoed: Option<Vec<EchoedItem>>,
    pub raw_output: String,
}

impl CategorizedResult {
    /// Number of signals across all four buckets.
    pub fn total(&self) -> usize {
        self.found.len() + self.maybe_found.len() + self.not_found.len() + self.unparsed_or_other.len()
    }
}

/// The success body of `POST /upload`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub filepath: String,
}

/// The body of `GET /models`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// The failure body shared by every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
}
