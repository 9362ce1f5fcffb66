use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::FieldKind;

/// Per-field score weights for multi-term ranking.
///
/// The defaults are strictly tiered: one title hit outranks any realistic
/// number of heading hits, and one heading hit outranks the references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub title: u64,
    pub heading: u64,
    pub reference: u64,
}

impl Default for Weights {
    fn default() -> Self { Self { title: 10_000, heading: 100, reference: 1 } }
}

impl Weights {
    pub fn weight_of(&self, kind: FieldKind) -> u64 {
        match kind {
            FieldKind::Title => self.title,
            FieldKind::Heading => self.heading,
            FieldKind::Reference => self.reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Terms shorter than this many characters get `short_term_cap`
    pub short_term_len: usize,
    pub short_term_cap: usize,
    pub long_term_cap: usize,
    /// Single-term searches with at least this many matching postings show headers only
    pub disclosure_threshold: usize,
    pub weights: Weights,
    /// Prepended to `Page::file` when composing a navigation location
    pub link_prefix: String,
    pub highlight_param: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            short_term_len: 3,
            short_term_cap: 100,
            long_term_cap: 1000,
            disclosure_threshold: 20,
            weights: Weights::default(),
            link_prefix: String::new(),
            highlight_param: "highlight".to_string(),
        }
    }
}

impl SearchConfig {
    /// Maximum number of rows a single-term search for `term` may emit.
    pub fn row_cap(&self, term: &str) -> usize {
        if term.chars().count() < self.short_term_len {
            self.short_term_cap
        } else {
            self.long_term_cap
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}
