//! Decoder for the textual index feed written by the documentation build.
//!
//! Each bucket value packs its postings as `term=occ,occ;term=occ`, where an
//! occurrence is a field tag (`t`, `h`, `r`) followed by a page id. The feed is
//! decoded once into the typed [`Index`] model; queries never see the text form.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use crate::error::FeedError;
use crate::{FieldKind, Index, Occurrence, Page, PageId, Posting};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEntry {
    pub file: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexFeed {
    pub pages: Vec<PageEntry>,
    #[serde(default)]
    pub buckets: BTreeMap<String, String>,
}

impl IndexFeed {
    pub fn from_json(text: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FeedError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn decode(self) -> Result<Index, FeedError> {
        let pages: Vec<Page> = self
            .pages
            .into_iter()
            .enumerate()
            .map(|(id, p)| Page { id: id as PageId, file: p.file, title: p.title })
            .collect();

        let mut buckets: HashMap<char, Vec<Posting>> = HashMap::with_capacity(self.buckets.len());
        for (key, encoded) in &self.buckets {
            let letter = bucket_key(key)?;
            if buckets.contains_key(&letter) {
                return Err(FeedError::DuplicateBucket(letter));
            }
            buckets.insert(letter, decode_bucket(letter, encoded)?);
        }

        let index = Index::new(pages, buckets)?;
        tracing::debug!(pages = index.page_count(), postings = index.posting_count(), "feed decoded");
        Ok(index)
    }
}

fn bucket_key(key: &str) -> Result<char, FeedError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => Ok(l),
                _ => Err(FeedError::InvalidBucketKey(key.to_string())),
            }
        }
        _ => Err(FeedError::InvalidBucketKey(key.to_string())),
    }
}

/// Decode one bucket's `term=occ,..;term=occ,..` string, preserving builder order.
pub fn decode_bucket(bucket: char, encoded: &str) -> Result<Vec<Posting>, FeedError> {
    let mut postings = Vec::new();
    for entry in encoded.split(';') {
        if entry.is_empty() { continue; }
        let (term, occ_list) = entry
            .split_once('=')
            .ok_or_else(|| FeedError::MissingSeparator { bucket, entry: entry.to_string() })?;
        let occurrences = occ_list
            .split(',')
            .filter(|o| !o.is_empty())
            .map(|o| parse_occurrence(bucket, o))
            .collect::<Result<Vec<_>, _>>()?;
        postings.push(Posting::new(term, occurrences));
    }
    Ok(postings)
}

fn parse_occurrence(bucket: char, entry: &str) -> Result<Occurrence, FeedError> {
    let mut chars = entry.chars();
    let kind = chars
        .next()
        .and_then(FieldKind::from_tag)
        .ok_or_else(|| FeedError::UnknownFieldKind { bucket, entry: entry.to_string() })?;
    let page_id = chars
        .as_str()
        .parse::<PageId>()
        .map_err(|_| FeedError::InvalidPageId { bucket, entry: entry.to_string() })?;
    Ok(Occurrence { kind, page_id })
}
