//! # Image Analysis Prompts
//!
//! The prompt text sent to the vision model. The output format it prescribes is
//! the one [`crate::parser::parse_model_output`] understands.

use crate::types::ItemQuery;

pub const ANALYSIS_PREAMBLE: &str = "Analyze the provided image. ";

/// Placeholders: `{items}`
pub const CUSTOM_ITEMS_INSTRUCTION: &str = "You are tasked with finding *only* the following specific items in the image: {items}. Do not identify or list any other items. ";

pub const DEFAULT_ITEMS_INSTRUCTION: &str = "Analyze the image for any notable items. ";

pub const OUTPUT_FORMAT_INSTRUCTION: &str = r#"Present your findings using the following exact headers and format for each category if items are found (omit category if no items):
**Found Items:**
* [item_name_1] [confidence] (optional brief detail)
* [item_name_2] [confidence]
...
**Maybe Found Item:**
* [item_name_3] [confidence] (optional brief detail)
...
**Not Found Item:**
* [item_name_4] [confidence]
...
List each item on a new line, prefixed with '* '. Replace [confidence] with your confidence that the item is present, as a number between 0.00 and 1.00 in square brackets, e.g. [0.85]. Do not add any other comments or explanations outside of the optional brief detail in parentheses for an item. If no items are found for a category, omit the header for that category entirely."#;

/// Builds the full analysis prompt for an item query.
///
/// An empty query lets the model choose notable items itself.
pub fn build_analysis_prompt(items: &ItemQuery) -> String {
    let mut prompt = String::from(ANALYSIS_PREAMBLE);
    if items.is_empty() {
        prompt.push_str(DEFAULT_ITEMS_INSTRUCTION);
    } else {
        prompt.push_str(&CUSTOM_ITEMS_INSTRUCTION.replace("{items}", &items.items().join(", ")));
    }
    prompt.push_str(OUTPUT_FORMAT_INSTRUCTION);
    prompt
}
