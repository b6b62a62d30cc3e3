use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::tracks::{year_domain, Track};

pub const DEFAULT_MAX_MINUTES: u32 = 31;

fn trailing_article_re() -> &'static Regex {
    static ARTICLE_RE: OnceLock<Regex> = OnceLock::new();
    ARTICLE_RE.get_or_init(|| Regex::new(r"(?i)^(.*),\s*(the|a|an)$").expect("valid article regex"))
}

fn leading_int_re() -> &'static Regex {
    static LEADING_INT_RE: OnceLock<Regex> = OnceLock::new();
    LEADING_INT_RE.get_or_init(|| Regex::new(r"^[+-]?[0-9]+").expect("valid leading integer regex"))
}

fn whitespace_re() -> &'static Regex {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Comparison key for artist names: `"Beatles, The"` and `"the  beatles"`
/// both become `"the beatles"`.
pub fn normalize_artist(name: &str) -> String {
    let trimmed = name.trim();
    let reordered = match trailing_article_re().captures(trimmed) {
        Some(caps) => format!("{} {}", &caps[2], &caps[1]),
        None => trimmed.to_string(),
    };
    whitespace_re()
        .replace_all(&reordered, " ")
        .trim()
        .to_lowercase()
}

/// Which tracks the dashboard currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackFilter {
    pub year_min: i32,
    pub year_max: i32,
    pub max_minutes: u32,
    pub artists: Vec<String>,
    pub labels: Vec<String>,
}

/// Query-string form: `ymin`, `ymax`, `dmax`, and `|`-joined `art` / `lab`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ymin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ymax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab: Option<String>,
}

impl TrackFilter {
    /// Whole year domain of `tracks`, the default duration cap, nothing selected.
    pub fn defaults_for(tracks: &[Track]) -> Self {
        let (year_min, year_max) = year_domain(tracks);
        Self {
            year_min,
            year_max,
            max_minutes: DEFAULT_MAX_MINUTES,
            artists: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Overlay query parameters on `defaults`. Numbers are read from their
    /// leading digits (`"1970abc"` is 1970); anything else keeps the default.
    pub fn from_query(query: &TrackQuery, defaults: &TrackFilter) -> Self {
        fn number<T: std::str::FromStr>(value: &Option<String>, fallback: T) -> T {
            value
                .as_deref()
                .and_then(|v| leading_int_re().find(v.trim()))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(fallback)
        }

        fn list(value: &Option<String>) -> Vec<String> {
            value
                .as_deref()
                .map(|v| {
                    v.split('|')
                        .filter(|part| !part.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        }

        Self {
            year_min: number(&query.ymin, defaults.year_min),
            year_max: number(&query.ymax, defaults.year_max),
            max_minutes: number(&query.dmax, defaults.max_minutes),
            artists: list(&query.art),
            labels: list(&query.lab),
        }
    }

    pub fn to_query(&self) -> TrackQuery {
        let joined = |values: &[String]| (!values.is_empty()).then(|| values.join("|"));
        TrackQuery {
            ymin: Some(self.year_min.to_string()),
            ymax: Some(self.year_max.to_string()),
            dmax: Some(self.max_minutes.to_string()),
            art: joined(self.artists.as_slice()),
            lab: joined(self.labels.as_slice()),
        }
    }

    /// Toggle an artist in the selection, comparing normalized names.
    pub fn toggle_artist(&mut self, name: &str) {
        let key = normalize_artist(name);
        let before = self.artists.len();
        self.artists.retain(|a| normalize_artist(a) != key);
        if self.artists.len() == before {
            self.artists.push(name.to_string());
        }
    }

    pub fn toggle_label(&mut self, name: &str) {
        let before = self.labels.len();
        self.labels.retain(|l| l != name);
        if self.labels.len() == before {
            self.labels.push(name.to_string());
        }
    }

    pub fn apply<'a>(&self, tracks: &'a [Track]) -> Vec<&'a Track> {
        let artists: HashSet<String> = self.artists.iter().map(|a| normalize_artist(a)).collect();
        let labels: HashSet<&str> = self.labels.iter().map(String::as_str).collect();

        tracks
            .iter()
            .filter(|track| {
                if let Some(year) = track.year {
                    if year < self.year_min || year > self.year_max {
                        return false;
                    }
                }
                if let Some(secs) = track.secs {
                    if f64::from(secs) / 60.0 > f64::from(self.max_minutes) {
                        return false;
                    }
                }
                if !artists.is_empty() && !artists.contains(&normalize_artist(&track.artist)) {
                    return false;
                }
                if !labels.is_empty() && !track.labels.iter().any(|l| labels.contains(l.as_str())) {
                    return false;
                }
                true
            })
            .collect()
    }
}
