use url::form_urlencoded;

use crate::{Index, PageId, SearchConfig};

/// The document viewport that shows search hits.
pub trait NavigationTarget {
    fn current_location(&self) -> String;
    fn load(&mut self, location: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Loaded(String),
    /// The target already shows the page; nothing was reloaded.
    AlreadyShowing,
    UnknownPage,
}

/// Percent-encode a highlight term. Spaces become `%20`, not `+`.
pub fn encode_component(term: &str) -> String {
    // form encoding escapes a literal '+' as %2B, so any '+' left is a space
    form_urlencoded::byte_serialize(term.as_bytes()).collect::<String>().replace('+', "%20")
}

/// Location of `page_id` with a highlight hint for `term`.
pub fn location_for(index: &Index, config: &SearchConfig, page_id: PageId, term: &str) -> Option<String> {
    let page = index.page(page_id)?;
    Some(format!(
        "{}{}?{}={}",
        config.link_prefix,
        page.file,
        config.highlight_param,
        encode_component(term)
    ))
}

/// Point `target` at `page_id` unless it is already showing that page.
pub fn navigate<T: NavigationTarget + ?Sized>(
    index: &Index,
    config: &SearchConfig,
    page_id: PageId,
    term: &str,
    target: &mut T,
) -> Navigation {
    let (Some(page), Some(location)) = (index.page(page_id), location_for(index, config, page_id, term)) else {
        tracing::warn!(page_id, "navigation to unknown page");
        return Navigation::UnknownPage;
    };
    if target.current_location().ends_with(&page.file) {
        return Navigation::AlreadyShowing;
    }
    tracing::debug!(page_id, %location, "loading page");
    target.load(&location);
    Navigation::Loaded(location)
}

/// Navigation target that only remembers where it is. Used by the server and
/// the command line, where the real viewport lives on the other side.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    pub location: String,
}

impl Viewport {
    pub fn at(location: impl Into<String>) -> Self { Self { location: location.into() } }
}

impl NavigationTarget for Viewport {
    fn current_location(&self) -> String { self.location.clone() }

    fn load(&mut self, location: &str) { self.location = location.to_string(); }
}
