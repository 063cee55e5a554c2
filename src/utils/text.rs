/// Text helpers for result display
use regex::Regex;
use std::sync::OnceLock;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Correlation as a percentage rounded to two decimals, e.g. `87.5%`
pub fn format_correlation(correlation: f64) -> String {
    let percent = (correlation * 10000.0).round() / 100.0;
    format!("{percent}%")
}

/// Collapse newlines and runs of whitespace into single spaces
pub fn normalize_snippet(snippet: &str) -> String {
    whitespace_run().replace_all(snippet.trim(), " ").into_owned()
}

/// Snippet as shown under a result: one line, followed by an ellipsis
pub fn snippet_line(snippet: &str) -> String {
    format!("{} ...", normalize_snippet(snippet))
}

/// Cut `title` at a word boundary so it fits in `ratio * max_width` columns.
///
/// Titles that fit are returned unchanged; otherwise the words that fit are
/// kept and ` ...` is appended.
pub fn truncate_title(title: &str, max_width: usize, ratio: f64) -> String {
    let limit = ((max_width as f64) * ratio).floor() as usize;
    let title = normalize_snippet(title);
    if title.chars().count() <= limit {
        return title;
    }

    let mut kept = String::new();
    for word in title.split(' ') {
        let candidate_len = kept.chars().count() + word.chars().count() + 1;
        if candidate_len > limit {
            break;
        }
        kept.push_str(word);
        kept.push(' ');
    }

    format!("{} ...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_correlation() {
        assert_eq!(format_correlation(0.875), "87.5%");
        assert_eq!(format_correlation(0.123456), "12.35%");
        assert_eq!(format_correlation(1.0), "100%");
        assert_eq!(format_correlation(0.0), "0%");
    }

    #[test]
    fn test_snippet_is_single_line() {
        assert_eq!(
            snippet_line("  The ocean\n covers\t71% of Earth "),
            "The ocean covers 71% of Earth ..."
        );
    }

    #[test]
    fn test_short_title_unchanged() {
        assert_eq!(truncate_title("Pacific Ocean", 40, 0.9), "Pacific Ocean");
    }

    #[test]
    fn test_long_title_cut_at_word() {
        let title = "Oceanography of the North Atlantic and its marginal seas";
        let cut = truncate_title(title, 30, 0.9);
        assert_eq!(cut, "Oceanography of the North ...");
    }

    #[test]
    fn test_single_long_word() {
        assert_eq!(truncate_title("Supercalifragilistic", 10, 0.9), " ...");
    }
}
