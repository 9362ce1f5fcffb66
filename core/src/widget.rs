use anyhow::Result;

use crate::emit::{paint, FirstLink, RenderSink};
use crate::engine::{QueryOutcome, SearchEngine};
use crate::navigate::{Navigation, NavigationTarget};
use crate::PageId;

/// Search box state: the current input value, the sink showing its results and
/// the row that "jump to first result" goes to.
pub struct SearchWidget<'e, S: RenderSink> {
    engine: &'e SearchEngine,
    sink: S,
    input: String,
    first_link: Option<FirstLink>,
}

impl<'e, S: RenderSink> SearchWidget<'e, S> {
    pub fn new(engine: &'e SearchEngine, sink: S) -> Self {
        Self { engine, sink, input: String::new(), first_link: None }
    }

    pub fn input(&self) -> &str { &self.input }

    pub fn sink(&self) -> &S { &self.sink }

    pub fn first_link(&self) -> Option<&FirstLink> { self.first_link.as_ref() }

    /// The input field changed.
    pub fn on_input(&mut self, value: &str) -> Result<()> {
        self.input = value.to_string();
        self.refresh(None)
    }

    /// A term header was activated: show its pages even if the term list is collapsed.
    pub fn expand(&mut self, term: &str) -> Result<()> { self.refresh(Some(term)) }

    pub fn clear_input(&mut self) -> Result<()> { self.on_input("") }

    /// Navigate to the first page link of the current results, if there is one.
    pub fn go_first<T: NavigationTarget + ?Sized>(&self, target: &mut T) -> Result<Option<Navigation>> {
        match &self.first_link {
            Some(link) => Ok(Some(self.engine.navigate(link.page_id, &link.term, target)?)),
            None => Ok(None),
        }
    }

    /// A page row was activated.
    pub fn activate<T: NavigationTarget + ?Sized>(&self, page_id: PageId, term: &str, target: &mut T) -> Result<Navigation> {
        self.engine.navigate(page_id, term, target)
    }

    fn refresh(&mut self, force_expand: Option<&str>) -> Result<()> {
        let outcome = self.engine.search(&self.input, force_expand)?;
        self.sink.clear();
        self.first_link = None;
        match outcome {
            QueryOutcome::NoQuery => self.sink.set_clear_visible(false),
            QueryOutcome::Results(results) => {
                self.sink.set_clear_visible(true);
                paint(&results, &mut self.sink);
                self.first_link = results.first_link;
            }
        }
        Ok(())
    }
}
