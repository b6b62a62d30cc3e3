use regex::Regex;
use std::sync::OnceLock;

struct FormatRule {
    pattern: &'static str,
    label: &'static str,
}

/// Checked in order against the lowercased input; first hit wins.
const FORMAT_RULES: &[FormatRule] = &[
    FormatRule { pattern: r#"(^|\W)lp(\W|$)"#, label: "LP" },
    FormatRule { pattern: r#"(^|\W)12"?(\W|$)"#, label: "12\"" },
    FormatRule { pattern: r#"(^|\W)7"?(\W|$)"#, label: "7\"" },
    FormatRule { pattern: r#"(^|\W)10"?(\W|$)"#, label: "10\"" },
    FormatRule { pattern: r"cd", label: "CD" },
    FormatRule { pattern: r"cassette|tape", label: "Cassette" },
    FormatRule { pattern: r"file|digital", label: "Digital" },
];

fn compiled_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        FORMAT_RULES
            .iter()
            .map(|rule| (Regex::new(rule.pattern).expect("valid format regex"), rule.label))
            .collect()
    })
}

/// Map a Discogs format name or description onto a small set of buckets.
/// Unrecognized strings come back unchanged; blank input yields `None`.
pub fn normalize_format(s: &str) -> Option<String> {
    let t = s.trim().to_lowercase();
    if t.is_empty() {
        return None;
    }

    let label = compiled_rules()
        .iter()
        .find(|(re, _)| re.is_match(&t))
        .map(|(_, label)| label.to_string());

    Some(label.unwrap_or_else(|| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(s: &str) -> String {
        normalize_format(s).unwrap()
    }

    #[test]
    fn classifies_common_formats() {
        assert_eq!(fmt("LP, Gatefold"), "LP");
        assert_eq!(fmt("7\" Single"), "7\"");
        assert_eq!(fmt("12\""), "12\"");
        assert_eq!(fmt("10\""), "10\"");
        assert_eq!(fmt("CD"), "CD");
        assert_eq!(fmt("CDr"), "CD");
        assert_eq!(fmt("Cassette"), "Cassette");
        assert_eq!(fmt("8-Track Tape"), "Cassette");
        assert_eq!(fmt("File"), "Digital");
    }

    #[test]
    fn unknown_passes_through() {
        assert_eq!(fmt("Unknown Wax Cylinder"), "Unknown Wax Cylinder");
        assert_eq!(fmt("Vinyl"), "Vinyl");
        assert_eq!(fmt("Album"), "Album");
    }

    #[test]
    fn lp_needs_word_boundaries() {
        assert_eq!(fmt("Help"), "Help");
        assert_eq!(fmt("2xLP"), "2xLP");
        assert_eq!(fmt("(lp)"), "LP");
    }

    #[test]
    fn blank_is_dropped() {
        assert_eq!(normalize_format("   "), None);
    }

    #[test]
    fn classified_labels_are_stable() {
        for label in ["LP", "12\"", "7\"", "10\"", "CD", "Cassette", "Digital"] {
            assert_eq!(fmt(label), label);
        }
    }
}
