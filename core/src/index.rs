use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::FeedError;

pub type PageId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    /// Path of the page relative to the documentation root, e.g. `grammar.html`
    pub file: String,
    pub title: String,
}

/// Where in a page a term was found. Drives the multi-term score weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Title,
    Heading,
    Reference,
}

impl FieldKind {
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            't' => Some(Self::Title),
            'h' => Some(Self::Heading),
            'r' => Some(Self::Reference),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub kind: FieldKind,
    pub page_id: PageId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Term in its original casing, used for headers and highlight hints
    pub term: String,
    lower: String,
    /// Builder order, duplicates included
    pub occurrences: Vec<Occurrence>,
}

impl Posting {
    pub fn new(term: impl Into<String>, occurrences: Vec<Occurrence>) -> Self {
        let term = term.into();
        let lower = term.to_lowercase();
        Self { term, lower, occurrences }
    }

    pub fn lowercase_term(&self) -> &str { &self.lower }

    /// `prefix` must already be lowercase.
    pub fn matches_prefix(&self, prefix: &str) -> bool { self.lower.starts_with(prefix) }
}

/// Pages plus first-letter buckets of postings. Read-only once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    pages: Vec<Page>,
    buckets: HashMap<char, Vec<Posting>>,
}

impl Index {
    /// Assemble an index, checking that page ids are positional and that every
    /// occurrence points at an existing page.
    pub fn new(pages: Vec<Page>, buckets: HashMap<char, Vec<Posting>>) -> Result<Self, FeedError> {
        let index = Self { pages, buckets };
        index.validate()?;
        Ok(index)
    }

    pub fn validate(&self) -> Result<(), FeedError> {
        for (position, page) in self.pages.iter().enumerate() {
            if page.id as usize != position {
                return Err(FeedError::MisnumberedPage { position, id: page.id });
            }
        }
        let occurrences = self.buckets.values().flatten().flat_map(|p| p.occurrences.iter());
        for occ in occurrences {
            if occ.page_id as usize >= self.pages.len() {
                return Err(FeedError::PageOutOfRange { page_id: occ.page_id, pages: self.pages.len() });
            }
        }
        Ok(())
    }

    pub fn page(&self, id: PageId) -> Option<&Page> { self.pages.get(id as usize) }

    pub fn page_count(&self) -> usize { self.pages.len() }

    pub fn bucket_count(&self) -> usize { self.buckets.len() }

    pub fn posting_count(&self) -> usize { self.buckets.values().map(Vec::len).sum() }

    /// Bucket for the first character of an already-lowercased term.
    /// The empty term has no bucket.
    pub fn bucket(&self, lower_term: &str) -> Option<&[Posting]> {
        let first = lower_term.chars().next()?;
        self.buckets.get(&first).map(Vec::as_slice)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (char, &[Posting])> {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

/// Postings of `bucket` whose lowercase term starts with `lower_prefix`, in bucket order.
pub fn prefix_matches<'a, 'b>(bucket: &'a [Posting], lower_prefix: &'b str) -> impl Iterator<Item = &'a Posting> + 'b
where
    'a: 'b,
{
    bucket.iter().filter(move |p| p.matches_prefix(lower_prefix))
}
