//! # Analysis Request Builder

use crate::{
    errors::AnalysisError,
    types::{AnalysisRequest, ItemQuery, ThresholdConfig, UploadReference},
};

/// Assembles an [`AnalysisRequest`] from the caller's current inputs.
///
/// Fails with [`AnalysisError::MissingUpload`] when no upload has been
/// confirmed. `raw_item_text` is comma-separated; see
/// [`ItemQuery::from_raw_text`]. Thresholds are forwarded untouched, `NaN`
/// included.
pub fn build(
    upload: Option<&UploadReference>,
    model: &str,
    raw_item_text: &str,
    thresholds: ThresholdConfig,
) -> Result<AnalysisRequest, AnalysisError> {
    let image_path = upload.cloned().ok_or(AnalysisError::MissingUpload)?;
    Ok(AnalysisRequest {
        image_path,
        model: model.to_string(),
        custom_items: ItemQuery::from_raw_text(raw_item_text),
        thresholds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_upload_fails() {
        let result = build(None, "llava:latest", "cat", ThresholdConfig::new(0.8, 0.5));
        assert_eq!(result, Err(AnalysisError::MissingUpload));
    }

    #[test]
    fn test_build_normalizes_items() {
        let upload = UploadReference::new("static/uploads/a.png");
        let request = build(
            Some(&upload),
            "llava:latest",
            "cat, dog ,, cat",
            ThresholdConfig::new(0.8, 0.5),
        )
        .unwrap();

        assert_eq!(request.image_path, upload);
        assert_eq!(request.model, "llava:latest");
        assert_eq!(request.custom_items.items(), ["cat", "dog", "cat"]);
    }

    #[test]
    fn test_build_forwards_nan_thresholds() {
        let upload = UploadReference::new("x.png");
        let thresholds = ThresholdConfig::parse_lenient("", "0.4");
        let request = build(Some(&upload), "m", "", thresholds).unwrap();
        assert!(request.thresholds.found_low.is_nan());
        assert_eq!(request.thresholds.maybe_low, 0.4);
        assert!(request.custom_items.is_empty());
    }

    #[test]
    fn test_build_is_repeatable() {
        let upload = UploadReference::new("x.png");
        let thresholds = ThresholdConfig::new(0.7, 0.4);
        let first = build(Some(&upload), "m", "a,b", thresholds).unwrap();
        let second = build(Some(&upload), "m", "a,b", thresholds).unwrap();
        assert_eq!(first, second);
    }
}
