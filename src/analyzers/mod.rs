use serde::Serialize;
use std::collections::HashMap;

pub mod collection;
pub mod tracks;

/// Chart-ready `{ name, value }` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub name: String,
    pub value: usize,
}

impl Bucket {
    pub fn new(name: impl Into<String>, value: usize) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Counter that remembers the order keys were first seen in.
#[derive(Debug, Default)]
pub struct CountMap {
    index: HashMap<String, usize>,
    entries: Vec<Bucket>,
}

impl CountMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].value += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push(Bucket::new(key, 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn into_buckets(self) -> Vec<Bucket> {
        self.entries
    }

    /// Entries ordered by their key parsed as a number (leading digits).
    pub fn into_numeric_order(self) -> Vec<Bucket> {
        let mut entries = self.entries;
        entries.sort_by_key(|b| leading_number(&b.name));
        entries
    }

    /// The `n` largest counts; the sort is stable so ties keep first-seen order.
    pub fn into_top(self, n: usize) -> Vec<Bucket> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.value.cmp(&a.value));
        entries.truncate(n);
        entries
    }
}

fn leading_number(s: &str) -> i64 {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
