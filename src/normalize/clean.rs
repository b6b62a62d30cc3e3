use regex::Regex;
use std::sync::OnceLock;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

fn whitespace_re() -> &'static Regex {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn parenthetical_re() -> &'static Regex {
    static PARENTHETICAL_RE: OnceLock<Regex> = OnceLock::new();
    PARENTHETICAL_RE.get_or_init(|| Regex::new(r"\s*\(.*?\)\s*").expect("valid parenthetical regex"))
}

fn trailing_disambiguator_re() -> &'static Regex {
    static TRAILING_RE: OnceLock<Regex> = OnceLock::new();
    TRAILING_RE.get_or_init(|| Regex::new(r"\s+\(.*?\)$").expect("valid disambiguator regex"))
}

fn year_re() -> &'static Regex {
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    YEAR_RE.get_or_init(|| Regex::new(r"[0-9]{4}").expect("valid year regex"))
}

fn multi_value_re() -> &'static Regex {
    static MULTI_RE: OnceLock<Regex> = OnceLock::new();
    MULTI_RE.get_or_init(|| Regex::new(r"[,;]+").expect("valid separator regex"))
}

/// Collapse whitespace and drop parenthesized segments, so
/// `"Columbia  Records (2)"` becomes `"Columbia Records"`.
pub fn clean(s: &str) -> String {
    let collapsed = whitespace_re().replace_all(s, " ");
    let without_parens = parenthetical_re().replace_all(&collapsed, " ");
    whitespace_re()
        .replace_all(&without_parens, " ")
        .trim()
        .to_string()
}

/// Grouping key for an artist: a trailing `" (2)"`-style suffix is removed.
pub fn artist_key(name: &str) -> String {
    trailing_disambiguator_re().replace(name, "").into_owned()
}

/// First run of four digits, if it lies in `[1900, 2100]`.
pub fn to_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let year: i32 = year_re().find(value)?.as_str().parse().ok()?;
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

pub fn decade_of(year: i32) -> String {
    format!("{}s", year.div_euclid(10) * 10)
}

/// Split a comma/semicolon separated field into trimmed, non-empty parts.
pub fn split_multi(value: &str) -> Vec<String> {
    multi_value_re()
        .split(value)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
