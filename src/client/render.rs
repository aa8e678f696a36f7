// Plain-text rendering of summaries and failures for the terminal

use std::fmt::Write as _;

use super::ClientFailure;
use crate::models::SummaryResult;

/// Which summary length to show
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryLength {
    Short,
    Medium,
    Long,
    #[default]
    All,
}

pub fn render_summary(summary: &SummaryResult, length: SummaryLength) -> String {
    let mut out = String::new();

    let sections: Vec<(&str, &str)> = match length {
        SummaryLength::Short => vec![("Short", summary.short.as_str())],
        SummaryLength::Medium => vec![("Medium", summary.medium.as_str())],
        SummaryLength::Long => vec![("Long", summary.long.as_str())],
        SummaryLength::All => vec![
            ("Short", summary.short.as_str()),
            ("Medium", summary.medium.as_str()),
            ("Long", summary.long.as_str()),
        ],
    };

    for (label, text) in sections {
        let _ = writeln!(out, "== Summary ({}) ==", label);
        let _ = writeln!(out, "{}\n", text.trim());
    }

    let _ = writeln!(out, "== Key Points ==");
    for (index, point) in summary.key_points.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", index + 1, point);
    }

    let _ = writeln!(out, "\n== Improvement Suggestions ==");
    for improvement in &summary.improvements {
        let _ = writeln!(out, " - {}", improvement);
    }

    out
}

/// One-line notice: title plus the first line of the message
pub fn render_failure(failure: &ClientFailure) -> String {
    format!("{}: {}", failure.title, failure.headline())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> SummaryResult {
        SummaryResult {
            short: "Short text.".to_string(),
            medium: "Medium text.".to_string(),
            long: "Long text.".to_string(),
            key_points: vec!["Jane Doe".into(), "01/02/2024".into(), "CERT-00042".into()],
            improvements: vec!["Sign it".into(), "Date it".into(), "Scan it".into()],
            extra: Default::default(),
        }
    }

    #[test]
    fn test_render_single_length() {
        let text = render_summary(&summary(), SummaryLength::Medium);
        assert!(text.contains("== Summary (Medium) =="));
        assert!(text.contains("Medium text."));
        assert!(!text.contains("Short text."));
        assert!(!text.contains("Long text."));
    }

    #[test]
    fn test_render_numbers_key_points_in_order() {
        let text = render_summary(&summary(), SummaryLength::All);
        let first = text.find(" 1. Jane Doe").unwrap();
        let third = text.find(" 3. CERT-00042").unwrap();
        assert!(first < third);
        assert!(text.contains(" - Scan it"));
    }

    #[test]
    fn test_render_failure_keeps_first_line_only() {
        let failure = ClientFailure::classify(Some(500), "Failed to process document\nupstream detail");
        assert_eq!(render_failure(&failure), "Error: Failed to process document");
    }

    #[test]
    fn test_render_failure() {
        let failure = ClientFailure::classify(Some(429), "");
        assert!(render_failure(&failure).starts_with("Too Many Requests: Rate limit reached."));
    }
}
