//! Prompt composition.
//!
//! The analysis instructions and the JSON shape the caller expects live in
//! `prompts/full_analysis.txt`; each route only appends its task line.

/// Identification rules plus the response schema, sent with every request.
pub const FULL_ANALYSIS_PROMPT: &str = include_str!("../../prompts/full_analysis.txt");

/// Prompt for identifying the product shown in an attached image.
pub fn image_prompt() -> String {
    format!(
        "{}\n\nAnalyze the product in this image:",
        FULL_ANALYSIS_PROMPT
    )
}

/// Prompt for identifying a product from its barcode alone.
pub fn barcode_prompt(barcode: &str) -> String {
    format!(
        "{}\n\nIdentify and analyze the product with barcode: {}. \
         If unsure, make your best guess based on common products with similar barcodes.",
        FULL_ANALYSIS_PROMPT, barcode
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_describes_the_expected_reply() {
        assert!(FULL_ANALYSIS_PROMPT.contains("\"sustainableScore\""));
        assert!(FULL_ANALYSIS_PROMPT.contains("Return ONLY the raw JSON"));
    }

    #[test]
    fn image_prompt_ends_with_task_line() {
        let prompt = image_prompt();
        assert!(prompt.starts_with(FULL_ANALYSIS_PROMPT));
        assert!(prompt.ends_with("\n\nAnalyze the product in this image:"));
    }

    #[test]
    fn barcode_prompt_embeds_code_and_fallback() {
        let prompt = barcode_prompt("8901030895557");
        assert!(prompt.starts_with(FULL_ANALYSIS_PROMPT));
        assert!(prompt.contains("product with barcode: 8901030895557."));
        assert!(prompt.ends_with("common products with similar barcodes."));
    }
}
