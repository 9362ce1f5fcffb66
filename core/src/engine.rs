use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::emit::SearchResults;
use crate::feed::IndexFeed;
use crate::navigate::{self, Navigation, NavigationTarget};
use crate::normalize::{normalize, Query};
use crate::persist::{load_snapshot, IndexPaths};
use crate::{search_multi, search_single, Index, PageId, SearchConfig};

/// Where the engine gets its index from on first use.
pub trait IndexSource: Send + Sync {
    fn load(&self) -> Result<Index>;

    fn describe(&self) -> String;
}

/// A JSON feed file as written by the documentation build.
pub struct FeedFile(pub PathBuf);

impl IndexSource for FeedFile {
    fn load(&self) -> Result<Index> {
        let f = File::open(&self.0).with_context(|| format!("opening feed {}", self.0.display()))?;
        let feed = IndexFeed::from_reader(BufReader::new(f))?;
        Ok(feed.decode()?)
    }

    fn describe(&self) -> String { format!("feed {}", self.0.display()) }
}

/// A snapshot directory written by `persist::save_snapshot`.
pub struct SnapshotDir(pub PathBuf);

impl IndexSource for SnapshotDir {
    fn load(&self) -> Result<Index> { load_snapshot(&IndexPaths::new(&self.0)) }

    fn describe(&self) -> String { format!("snapshot {}", self.0.display()) }
}

/// Feed text already in memory.
pub struct FeedText(pub String);

impl IndexSource for FeedText {
    fn load(&self) -> Result<Index> { Ok(IndexFeed::from_json(&self.0)?.decode()?) }

    fn describe(&self) -> String { "inline feed".to_string() }
}

/// Directories are snapshots, anything else is read as a JSON feed.
pub fn source_for_path<P: AsRef<Path>>(path: P) -> Box<dyn IndexSource> {
    let path = path.as_ref().to_path_buf();
    if path.is_dir() {
        Box::new(SnapshotDir(path))
    } else {
        Box::new(FeedFile(path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The input normalized to nothing: clear the results and hide the clear affordance.
    NoQuery,
    Results(SearchResults),
}

/// Owns the configuration and the lazily built, immutable index.
pub struct SearchEngine {
    source: Box<dyn IndexSource>,
    config: SearchConfig,
    index: OnceCell<Index>,
}

impl SearchEngine {
    pub fn new(source: Box<dyn IndexSource>, config: SearchConfig) -> Self {
        Self { source, config, index: OnceCell::new() }
    }

    /// Engine over an index that is already built.
    pub fn with_index(index: Index, config: SearchConfig) -> Self {
        let source = Box::new(FeedText(String::new()));
        Self { source, config, index: OnceCell::with_value(index) }
    }

    pub fn is_loaded(&self) -> bool { self.index.get().is_some() }

    /// The index, built from the source on first call. A failed build is not
    /// cached; the next call tries again.
    pub fn index(&self) -> Result<&Index> {
        self.index.get_or_try_init(|| {
            let index = self
                .source
                .load()
                .with_context(|| format!("loading index from {}", self.source.describe()))?;
            tracing::info!(
                source = %self.source.describe(),
                pages = index.page_count(),
                buckets = index.bucket_count(),
                postings = index.posting_count(),
                "index loaded"
            );
            Ok(index)
        })
    }

    /// Run a raw input value through normalization and the matching matcher.
    pub fn search(&self, raw: &str, force_expand: Option<&str>) -> Result<QueryOutcome> {
        let index = self.index()?;
        let outcome = match normalize(raw) {
            Query::Empty => QueryOutcome::NoQuery,
            Query::Single(term) => QueryOutcome::Results(search_single(index, &self.config, &term, force_expand)),
            Query::Multi(terms) => QueryOutcome::Results(search_multi(index, &self.config, &terms)),
        };
        Ok(outcome)
    }

    pub fn navigate<T: NavigationTarget + ?Sized>(&self, page_id: PageId, term: &str, target: &mut T) -> Result<Navigation> {
        let index = self.index()?;
        Ok(navigate::navigate(index, &self.config, page_id, term, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        loads: Arc<AtomicUsize>,
        fail_first: bool,
    }

    impl IndexSource for CountingSource {
        fn load(&self) -> Result<Index> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && n == 0 {
                anyhow::bail!("not yet");
            }
            FeedText(r#"{"pages":[{"file":"a.html","title":"A"}],"buckets":{"a":"alter=t0"}}"#.into()).load()
        }

        fn describe(&self) -> String { "counting".into() }
    }

    #[test]
    fn index_is_built_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let engine = SearchEngine::new(Box::new(CountingSource { loads: loads.clone(), fail_first: false }), SearchConfig::default());
        assert!(!engine.is_loaded());
        engine.search("alter", None).unwrap();
        engine.search("alter table", None).unwrap();
        engine.search("", None).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_load_is_retried() {
        let loads = Arc::new(AtomicUsize::new(0));
        let engine = SearchEngine::new(Box::new(CountingSource { loads: loads.clone(), fail_first: true }), SearchConfig::default());
        assert!(engine.search("alter", None).is_err());
        assert!(engine.search("alter", None).is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn blank_input_is_no_query() {
        let engine = SearchEngine::with_index(Index::default(), SearchConfig::default());
        assert_eq!(engine.search("  ?! ", None).unwrap(), QueryOutcome::NoQuery);
    }
}
