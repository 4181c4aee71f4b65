//! # Threshold Categorizer
//!
//! Sorts reported item signals into `found`, `maybe_found`, `not_found`, and
//! `unparsed_or_other` using a caller-supplied [`ThresholdConfig`].

use crate::{
    errors::AnalysisError,
    types::{AnalysisResponse, CategorizedResult, ItemSignal, ThresholdConfig},
};
use tracing::debug;

/// The bucket a single signal belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    Found,
    MaybeFound,
    NotFound,
    UnparsedOrOther,
}

/// Classifies one signal.
///
/// The `found` check runs first, so an inverted pair (`maybe_low > found_low`)
/// is applied mechanically rather than corrected. Any comparison against a
/// `NaN` threshold is false, which degrades the item towards `not_found`.
pub fn classify(signal: &ItemSignal, thresholds: &ThresholdConfig) -> Bucket {
    match signal.usable_confidence() {
        None => Bucket::UnparsedOrOther,
        Some(c) if c >= thresholds.found_low => Bucket::Found,
        Some(c) if c >= thresholds.maybe_low => Bucket::MaybeFound,
        Some(_) => Bucket::NotFound,
    }
}

/// Partitions `signals` into the four buckets, preserving input order within
/// each bucket. Nothing is sorted or deduplicated.
pub fn categorize<'a, I>(signals: I, thresholds: &ThresholdConfig) -> CategorizedResult
where
    I: IntoIterator<Item = &'a ItemSignal>,
{
    let mut result = CategorizedResult::default();
    for signal in signals {
        let bucket = match classify(signal, thresholds) {
            Bucket::Found => &mut result.found,
            Bucket::MaybeFound => &mut result.maybe_found,
            Bucket::NotFound => &mut result.not_found,
            Bucket::UnparsedOrOther => {
                debug!("{}", AnalysisError::MalformedSignal(signal.name.clone()));
                &mut result.unparsed_or_other
            }
        };
        bucket.push(signal.clone());
    }
    result
}

/// Categorizes every signal in a service response and carries over the echo
/// list and raw output untouched.
pub fn categorize_response(
    response: &AnalysisResponse,
    thresholds: &ThresholdConfig,
) -> CategorizedResult {
    let mut result = categorize(response.signals(), thresholds);
    result.queried_items_echoed = response.queried_items_echoed.clone();
    result.raw_output = response.raw_output.clone();
    result
}
