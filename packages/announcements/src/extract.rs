//! Pairing of company links with document links from listing markup.
//!
//! Two groups are derived independently from the same ordered href
//! sequence: tokens that are themselves company-marked document links, and
//! consecutive (company, document) pairs. Both are pure functions of the
//! input — no network, no state, no failure modes.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::types::AnnouncementUnit;

/// Trailing `.pdf` with an optional query/fragment suffix, case-insensitive.
static PDF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.pdf([#?].*)?$").expect("pdf pattern is valid"));

/// First path segment after the company marker.
static COMPANY_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/company/([^/]+)/?").expect("company pattern is valid"));

/// Substring that marks a company page href.
const COMPANY_MARKER: &str = "/company";

/// Fallback when a company href does not carry a name segment.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Extraction output: the two independent groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedGroups {
    /// Tokens that both carry the company marker and match the PDF pattern
    pub direct: Vec<String>,

    /// Consecutive (company href, document href) pairs in document order
    pub pairs: Vec<AnnouncementUnit>,
}

/// Collect anchor hrefs from listing markup in document order.
pub fn collect_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("selector is valid");

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

/// Derive both groups from an ordered href sequence.
pub fn extract_groups(hrefs: &[String]) -> ExtractedGroups {
    let direct = hrefs
        .iter()
        .filter(|h| h.contains(COMPANY_MARKER) && PDF_PATTERN.is_match(h))
        .cloned()
        .collect();

    let mut pairs = Vec::new();
    for window in hrefs.windows(2) {
        if window[0].contains(COMPANY_MARKER) && PDF_PATTERN.is_match(&window[1]) {
            pairs.push(AnnouncementUnit::new(&window[0], &window[1]));
        }
    }

    ExtractedGroups { direct, pairs }
}

/// Human-readable company name from a company href.
pub fn company_name_from_url(company_url: &str) -> String {
    COMPANY_NAME_PATTERN
        .captures(company_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hrefs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_adjacent_pairs_require_company_predecessor() {
        let input = hrefs(&[
            "/company/ABC/",
            "http://x/doc.pdf",
            "/other",
            "http://y/file.PDF?x=1",
        ]);

        let groups = extract_groups(&input);

        assert_eq!(
            groups.pairs,
            vec![AnnouncementUnit::new("/company/ABC/", "http://x/doc.pdf")]
        );
    }

    #[test]
    fn test_direct_group_needs_both_rules() {
        let input = hrefs(&[
            "/company/ABC/report.pdf",
            "/company/DEF/",
            "http://x/doc.pdf",
        ]);

        let groups = extract_groups(&input);

        assert_eq!(groups.direct, vec!["/company/ABC/report.pdf".to_string()]);
    }

    #[test]
    fn test_pdf_pattern_case_and_suffix() {
        assert!(PDF_PATTERN.is_match("http://x/a.pdf"));
        assert!(PDF_PATTERN.is_match("http://x/a.PDF"));
        assert!(PDF_PATTERN.is_match("http://x/a.pdf?x=1"));
        assert!(PDF_PATTERN.is_match("http://x/a.pdf#page=2"));
        assert!(!PDF_PATTERN.is_match("http://x/a.pdfs"));
        assert!(!PDF_PATTERN.is_match("http://x/a.pdf/extra"));
    }

    #[test]
    fn test_repeated_token_joins_multiple_pairs() {
        let input = hrefs(&[
            "/company/ABC/",
            "http://x/one.pdf",
            "/company/ABC/",
            "http://x/two.pdf",
        ]);

        let groups = extract_groups(&input);
        assert_eq!(groups.pairs.len(), 2);
        assert_eq!(groups.pairs[0].document_ref, "http://x/one.pdf");
        assert_eq!(groups.pairs[1].document_ref, "http://x/two.pdf");
    }

    #[test]
    fn test_empty_input_yields_empty_groups() {
        assert_eq!(extract_groups(&[]), ExtractedGroups::default());
    }

    #[test]
    fn test_collect_hrefs_preserves_document_order() {
        let html = r#"
            <div>
              <a href="/company/TCS/">TCS</a>
              <a href="https://example.com/doc.pdf">Doc</a>
              <a href=" /company/LT/ ">LT</a>
            </div>
        "#;

        let collected = collect_hrefs(html);
        assert_eq!(
            collected,
            hrefs(&["/company/TCS/", "https://example.com/doc.pdf", "/company/LT/"])
        );
    }

    #[test]
    fn test_company_name_extraction() {
        assert_eq!(company_name_from_url("/company/MAHSCOOTER/"), "MAHSCOOTER");
        assert_eq!(
            company_name_from_url("/company/TCS/consolidated/"),
            "TCS"
        );
        assert_eq!(company_name_from_url("/announcements/"), UNKNOWN_COMPANY);
    }
}
