//! # Summary parser
//!
//! Pulls the title and tag line out of the model's markdown summary.
//!
//! Both passes are total: output that doesn't follow the template yields a
//! default instead of an error.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

/// Returned when the summary has no usable title heading
pub const TITLE_PLACEHOLDER: &str = "no title";

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*##[ \t]*🚀[ \t]*(.+?)(?:[ \t]*\(Title\))?[ \t]*\r?$").unwrap()
});

static TAGS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[TAGS\][ \t]*(.+)").unwrap());

/// Extracts the title from the `## 🚀 [Title] (Title)` heading.
///
/// Surrounding brackets are removed. Falls back to [`TITLE_PLACEHOLDER`].
pub fn parse_title(summary: &str) -> String {
    TITLE_RE
        .captures(summary)
        .and_then(|cap| cap.get(1))
        .map(|m| {
            m.as_str()
                .trim()
                .trim_matches(|c| c == '[' || c == ']')
                .trim()
        })
        .filter(|title| !title.is_empty())
        .unwrap_or(TITLE_PLACEHOLDER)
        .to_string()
}

/// Extracts tags from the `[TAGS] a, b, c` line.
///
/// Tags are trimmed and empty fragments dropped; no marker yields no tags.
pub fn parse_tags(summary: &str) -> Vec<String> {
    let Some(line) = TAGS_RE.captures(summary).and_then(|cap| cap.get(1)) else {
        return Vec::new();
    };

    line.as_str()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "---
## 🚀 [Context-Aware AI] (Title)

### 💡 Analogy
- A librarian who remembers every book you ever borrowed

### ✨ Key Points
- Point 1

---
[TAGS] AI, productivity, tools
";

    #[test]
    fn test_title_from_template() {
        assert_eq!(parse_title("## 🚀 [Context-Aware AI] (Title)"), "Context-Aware AI");
        assert_eq!(parse_title(SUMMARY), "Context-Aware AI");
    }

    #[test]
    fn test_title_without_decoration() {
        assert_eq!(parse_title("##🚀 Plain title"), "Plain title");
        assert_eq!(parse_title("## 🚀 [Bracketed]"), "Bracketed");
    }

    #[test]
    fn test_title_with_crlf_line_endings() {
        assert_eq!(parse_title("## 🚀 [Windows] (Title)\r\nbody"), "Windows");
    }

    #[test]
    fn test_title_missing_marker_returns_placeholder() {
        assert_eq!(parse_title("# Some other heading\ntext"), TITLE_PLACEHOLDER);
        assert_eq!(parse_title(""), TITLE_PLACEHOLDER);
        assert_eq!(parse_title("## 🚀 [] (Title)"), TITLE_PLACEHOLDER);
    }

    #[test]
    fn test_tags_from_marker_line() {
        assert_eq!(
            parse_tags("... [TAGS] AI, productivity, tools"),
            vec!["AI", "productivity", "tools"]
        );
        assert_eq!(parse_tags(SUMMARY), vec!["AI", "productivity", "tools"]);
    }

    #[test]
    fn test_tags_drop_empty_fragments() {
        assert_eq!(parse_tags("[TAGS]  a ,, b ,  ,c,"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tags_stop_at_end_of_line() {
        assert_eq!(parse_tags("[TAGS] one, two\n---\ntranscript"), vec!["one", "two"]);
    }

    #[test]
    fn test_tags_missing_marker_returns_empty() {
        assert!(parse_tags("no marker here").is_empty());
        assert!(parse_tags("[TAGS]").is_empty());
    }
}
