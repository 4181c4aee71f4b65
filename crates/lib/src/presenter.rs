//! Presentation port driven by [`AnalysisSession`](crate::orchestrator::AnalysisSession).

use crate::types::CategorizedResult;

/// Placeholder shown when the service reports no (or an empty) echo list.
pub const NO_ITEMS_QUERIED: &str = "No specific items were listed by the model as being queried.";

/// Receives display updates from the orchestrator.
///
/// Calls arrive in a fixed order for each submission: `clear`, then
/// `set_loading(true)`, then exactly one `set_loading(false)` followed by
/// either `show_result` or `show_error`.
pub trait ResultPresenter {
    /// Shows or hides the in-flight indicator.
    fn set_loading(&mut self, loading: bool);

    /// Removes any displayed result and error.
    fn clear(&mut self);

    fn show_result(&mut self, result: &CategorizedResult);

    /// Shows a user-facing failure message.
    fn show_error(&mut self, message: &str);
}

/// Placeholder for a bucket with no items, e.g. `No items categorized as 'Found'.`
pub fn empty_bucket_placeholder(category: &str) -> String {
    format!("No items categorized as '{category}'.")
}
