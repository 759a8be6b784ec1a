//! Text preparation and the summarization prompt.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Marker appended when text is cut to the character budget.
pub const TRUNCATION_MARKER: &str = "...";

/// Collapse whitespace runs and truncate to the character budget.
///
/// Truncation cuts at exactly `max_chars` characters and appends the
/// marker, so the prepared text can exceed the budget only by the marker's
/// length.
pub fn prepare_text(text: &str, max_chars: usize) -> String {
    let cleaned = WHITESPACE.replace_all(text.trim(), " ").into_owned();

    if cleaned.chars().count() <= max_chars {
        return cleaned;
    }

    let mut truncated: String = cleaned.chars().take(max_chars).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// The structured financial-analysis prompt sent to the summarizer.
pub fn format_summary_prompt(text: &str, company_name: &str) -> String {
    format!(
        r#"You are a financial analyst specializing in Indian stock market announcements. Please analyze and summarize the following corporate announcement document for {company_name}.

Document Text:
{text}

Please provide a structured summary that includes:

1. **Document Type**: What type of announcement is this? (AGM, EGM, Quarterly Results, Dividend, Board Meeting, etc.)

2. **Summary**: A concise 2-3 sentence summary of the most important information

3. **Sentiment Analysis**: Assess the overall sentiment of the announcement (e.g., Positive, Negative, Neutral) and briefly explain your reasoning.

4. **Key Dates**: Extract any important dates mentioned (meeting dates, record dates, ex-dates, etc.)

5. **Financial Highlights**: Any financial figures, ratios, or performance metrics mentioned

6. **Corporate Actions**: Any dividends, bonuses, stock splits, or other corporate actions

7. **Business Updates**: Any significant business developments, partnerships, or strategic initiatives

8. **Regulatory Compliance**: Any regulatory filings, compliance updates, or SEBI-related information

Format your response as a clear, structured summary that would be useful for investors and analysts."#
    )
}

/// System role for the summarization request.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a professional financial analyst with expertise in Indian corporate announcements and stock market regulations.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(prepare_text("  a\n\n b\t\tc ", 100), "a b c");
    }

    #[test]
    fn test_truncation_at_exact_budget() {
        let text = "x".repeat(15_000);
        let prepared = prepare_text(&text, 12_000);

        assert_eq!(prepared.chars().count(), 12_000 + TRUNCATION_MARKER.len());
        assert!(prepared.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_short_text_is_untouched() {
        let prepared = prepare_text("short enough", 12_000);
        assert_eq!(prepared, "short enough");
    }

    #[test]
    fn test_prompt_mentions_company() {
        let prompt = format_summary_prompt("text", "TCS");
        assert!(prompt.contains("for TCS"));
        assert!(prompt.contains("Sentiment Analysis"));
    }
}
