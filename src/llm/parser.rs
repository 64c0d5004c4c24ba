//! Normalizes free-text model output into a list of short strings

use regex::Regex;
use std::sync::OnceLock;

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    // "1." enumerations and "-", "*", "•" bullets
    MARKER.get_or_init(|| Regex::new(r"^(?:\d+\.|[-*•])\s*").expect("marker regex is valid"))
}

/// Split model output into trimmed, non-empty lines with list markers and
/// markdown emphasis removed.
///
/// Markers are stripped until none remain, so `parse_response` is idempotent on
/// its own joined output.
pub fn parse_response(content: &str) -> Vec<String> {
    content
        .lines()
        .map(strip_markers)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_markers(line: &str) -> &str {
    let marker = marker_regex();
    let mut rest = line.trim();
    loop {
        if let Some(inner) = unwrap_emphasis(rest) {
            rest = inner.trim();
        } else if let Some(found) = marker.find(rest) {
            rest = rest[found.end()..].trim_start();
        } else {
            break;
        }
    }
    rest.trim_end()
}

/// Inner text of a `**bold**`, `__bold__` or `*italic*` line
fn unwrap_emphasis(text: &str) -> Option<&str> {
    ["**", "__", "*"].iter().find_map(|wrap| {
        text.strip_prefix(wrap)?
            .strip_suffix(wrap)
            .filter(|inner| !inner.trim().is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_enumeration_and_bullets() {
        assert_eq!(
            parse_response("1. Foo\n- Bar\n* Baz\n• Qux"),
            vec!["Foo", "Bar", "Baz", "Qux"]
        );
    }

    #[test]
    fn test_mixed_markers_and_blank_lines() {
        let input =
            "\n  1. Brand One\n\n2. Brand Two  \n- Brand Three\n* Brand Four\n   \n10.Brand Ten\n";
        assert_eq!(
            parse_response(input),
            vec!["Brand One", "Brand Two", "Brand Three", "Brand Four", "Brand Ten"]
        );
    }

    #[test]
    fn test_stacked_markers() {
        assert_eq!(parse_response("- 1. Nested\n1. - Other"), vec!["Nested", "Other"]);
    }

    #[test]
    fn test_strips_markdown_emphasis() {
        assert_eq!(
            parse_response("1. **Nexa**\n- *Voltio*\n__Lumen__\n* ** Orbit **\n**Kairo"),
            vec!["Nexa", "Voltio", "Lumen", "Orbit", "Kairo"]
        );
        // Asterisks inside a name are not emphasis
        assert_eq!(parse_response("Star*Gate\nNexa**"), vec!["Star*Gate", "Nexa**"]);
    }

    #[test]
    fn test_marker_only_and_empty_input() {
        assert!(parse_response("").is_empty());
        assert!(parse_response("   \n\t\n").is_empty());
        assert!(parse_response("-\n*\n•\n3.").is_empty());
    }

    #[test]
    fn test_keeps_inner_punctuation() {
        assert_eq!(
            parse_response("Taste the future - today\nBuilt 4 you"),
            vec!["Taste the future - today", "Built 4 you"]
        );
    }

    #[test]
    fn test_idempotent_on_clean_output() {
        let inputs = [
            "1. Foo\n- Bar\n* Baz\n• Qux",
            "- 1. Nested\n  * • Deep\nPlain",
            "Windows\r\nLine\r\n",
            "1. **Nexa**\n- *Voltio*\nStar*Gate",
        ];
        for input in inputs {
            let once = parse_response(input);
            let twice = parse_response(&once.join("\n"));
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }
}
