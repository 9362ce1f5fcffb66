//! Render instructions produced by the matchers and the sink that paints them.

use serde::Serialize;

use crate::{Index, PageId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instruction {
    /// A term row. Activating it re-runs the search with this term expanded.
    Header { term: String },
    /// A page row. `term` is the highlight hint passed on navigation.
    PageLink { page_id: PageId, term: String, title: String },
    /// Matching ran and found nothing.
    NoResults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstLink {
    pub page_id: PageId,
    pub term: String,
}

/// Ordered output of one search plus its default navigation target.
///
/// An empty `instructions` list with no `NoResults` row is the silent outcome of
/// a term whose first letter has no bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub instructions: Vec<Instruction>,
    pub first_link: Option<FirstLink>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool { self.instructions.is_empty() }

    pub fn is_no_results(&self) -> bool {
        matches!(self.instructions.as_slice(), [Instruction::NoResults])
    }

    pub fn page_links(&self) -> impl Iterator<Item = (PageId, &str)> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::PageLink { page_id, term, .. } => Some((*page_id, term.as_str())),
            _ => None,
        })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Header { term } => Some(term.as_str()),
            _ => None,
        })
    }
}

/// Accumulates rows for one search, enforcing an optional row cap.
pub(crate) struct Emitter<'a> {
    index: &'a Index,
    cap: Option<usize>,
    results: SearchResults,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(index: &'a Index, cap: Option<usize>) -> Self {
        Self { index, cap, results: SearchResults::default() }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.cap.is_some_and(|cap| self.results.instructions.len() >= cap)
    }

    /// Returns false when the row cap stopped the header from being added.
    pub(crate) fn header(&mut self, term: &str) -> bool {
        if self.is_full() {
            return false;
        }
        self.results.instructions.push(Instruction::Header { term: term.to_string() });
        true
    }

    /// Returns false when the row cap stopped the link from being added.
    pub(crate) fn page_link(&mut self, page_id: PageId, term: &str) -> bool {
        if self.is_full() {
            return false;
        }
        // Index::new guarantees every occurrence points at a loaded page.
        let title = self.index.page(page_id).map(|p| p.title.clone()).unwrap_or_default();
        if self.results.first_link.is_none() {
            self.results.first_link = Some(FirstLink { page_id, term: term.to_string() });
        }
        self.results.instructions.push(Instruction::PageLink { page_id, term: term.to_string(), title });
        true
    }

    /// Close the search, adding the no-results row if nothing was emitted.
    pub(crate) fn finish(mut self) -> SearchResults {
        if self.results.instructions.is_empty() {
            self.results.instructions.push(Instruction::NoResults);
        }
        self.results
    }
}

/// Presentation side of the widget. Receives instructions in emission order.
pub trait RenderSink {
    /// Remove every previously rendered row.
    fn clear(&mut self);

    fn render(&mut self, instruction: &Instruction);

    /// Show or hide the "clear input" affordance.
    fn set_clear_visible(&mut self, visible: bool);
}

pub fn paint<S: RenderSink + ?Sized>(results: &SearchResults, sink: &mut S) {
    for instruction in &results.instructions {
        sink.render(instruction);
    }
}

/// Sink that records everything it is told; handy for tests and JSON output.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub rows: Vec<Instruction>,
    pub clear_visible: bool,
    pub clears: usize,
}

impl RenderSink for RecordingSink {
    fn clear(&mut self) {
        self.rows.clear();
        self.clears += 1;
    }

    fn render(&mut self, instruction: &Instruction) { self.rows.push(instruction.clone()); }

    fn set_clear_visible(&mut self, visible: bool) { self.clear_visible = visible; }
}
