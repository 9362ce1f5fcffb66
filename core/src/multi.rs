use crate::emit::{Emitter, SearchResults};
use crate::index::prefix_matches;
use crate::{Index, PageId, SearchConfig};

/// AND search over several terms, ranked by weighted field hits.
///
/// Terms are processed in order. A page counts as matching term `i` only if it
/// already matched terms `0..i`; every occurrence on such a page adds its field
/// weight to the page score, so repeated hits raise the score without affecting
/// the AND condition. Candidates are emitted as page links by descending score,
/// ties kept in ascending page id order.
///
/// If any term's first letter has no bucket (including an empty term), the
/// whole search returns an empty result without a no-results row.
pub fn search_multi(index: &Index, config: &SearchConfig, terms: &[String]) -> SearchResults {
    if terms.is_empty() {
        return SearchResults::default();
    }

    let mut match_count = vec![0usize; index.page_count()];
    let mut score = vec![0u64; index.page_count()];

    for (i, raw) in terms.iter().enumerate() {
        let term = raw.to_lowercase();
        let Some(bucket) = index.bucket(&term) else {
            tracing::debug!(term = raw.as_str(), position = i, "no bucket for term, abandoning search");
            return SearchResults::default();
        };
        for posting in prefix_matches(bucket, &term) {
            for occ in &posting.occurrences {
                let page = occ.page_id as usize;
                if match_count[page] >= i {
                    if match_count[page] == i {
                        match_count[page] += 1;
                    }
                    score[page] += config.weights.weight_of(occ.kind);
                }
            }
        }
    }

    let mut candidates: Vec<usize> = (0..index.page_count()).filter(|&p| match_count[p] >= terms.len()).collect();
    // sort_by is stable, so equal scores keep ascending page order
    candidates.sort_by(|a, b| score[*b].cmp(&score[*a]));

    let highlight = terms.join(",");
    let mut emitter = Emitter::new(index, None);
    for page in &candidates {
        emitter.page_link(*page as PageId, &highlight);
    }

    let results = emitter.finish();
    tracing::debug!(terms = terms.len(), candidates = candidates.len(), "multi-term search");
    results
}
