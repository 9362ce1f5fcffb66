use crate::emit::{Emitter, SearchResults};
use crate::index::prefix_matches;
use crate::{Index, Posting, SearchConfig};

/// Prefix search for one term inside its first-letter bucket.
///
/// Every matching posting gets a header row. Occurrence rows follow a header
/// only when the total number of matching postings is below the disclosure
/// threshold, or when the posting's term is exactly `force_expand`. At most
/// `config.row_cap(term)` rows are emitted in total.
///
/// A term whose first letter has no bucket yields an empty result without a
/// no-results row.
pub fn search_single(index: &Index, config: &SearchConfig, term: &str, force_expand: Option<&str>) -> SearchResults {
    let lower = term.to_lowercase();
    let Some(bucket) = index.bucket(&lower) else {
        tracing::debug!(term, "no bucket for term");
        return SearchResults::default();
    };

    let matching: Vec<&Posting> = prefix_matches(bucket, &lower).collect();
    let expand_all = matching.len() < config.disclosure_threshold;

    let mut emitter = Emitter::new(index, Some(config.row_cap(term)));
    'postings: for posting in &matching {
        if !emitter.header(&posting.term) {
            break;
        }
        if expand_all || force_expand == Some(posting.term.as_str()) {
            for occ in &posting.occurrences {
                if !emitter.page_link(occ.page_id, &posting.term) {
                    break 'postings;
                }
            }
        }
    }

    let results = emitter.finish();
    tracing::debug!(term, matches = matching.len(), rows = results.instructions.len(), "single-term search");
    results
}
