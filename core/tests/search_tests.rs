mod common;

use common::{sample_index, wide_index, SAMPLE_FEED};
use docsearch_core::emit::RecordingSink;
use docsearch_core::engine::{source_for_path, FeedFile};
use docsearch_core::navigate::Viewport;
use docsearch_core::persist::{load_meta, load_snapshot, save_meta, save_snapshot, IndexPaths, MetaFile};
use docsearch_core::{Instruction, Navigation, QueryOutcome, SearchConfig, SearchEngine, SearchResults, SearchWidget};
use std::fs;
use tempfile::tempdir;

fn engine() -> SearchEngine {
    SearchEngine::with_index(sample_index(), SearchConfig::default())
}

fn results(engine: &SearchEngine, raw: &str) -> SearchResults {
    match engine.search(raw, None).unwrap() {
        QueryOutcome::Results(r) => r,
        QueryOutcome::NoQuery => panic!("{raw:?} normalized to nothing"),
    }
}

fn link(page_id: u32, term: &str, title: &str) -> Instruction {
    Instruction::PageLink { page_id, term: term.to_string(), title: title.to_string() }
}

#[test]
fn single_term_lists_headers_then_pages() {
    let r = results(&engine(), "sel");
    assert_eq!(
        r.instructions,
        vec![
            Instruction::Header { term: "select".into() },
            link(0, "select", "SQL Grammar"),
            link(1, "select", "Functions"),
            Instruction::Header { term: "selection".into() },
            link(2, "selection", "Tutorial"),
        ]
    );
}

#[test]
fn single_term_is_case_insensitive() {
    let engine = engine();
    assert_eq!(results(&engine, "SEL"), results(&engine, "sel"));
}

#[test]
fn two_headings_on_one_page_rank_it_first() {
    let r = results(&engine(), "create table");
    assert_eq!(
        r.instructions,
        vec![link(3, "create,table", "Features"), link(0, "create,table", "SQL Grammar")]
    );
    let first = r.first_link.unwrap();
    assert_eq!((first.page_id, first.term.as_str()), (3, "create,table"));
}

#[test]
fn multi_term_prefixes_rank_by_weight() {
    let r = results(&engine(), "s t");
    let pages: Vec<u32> = r.page_links().map(|(p, _)| p).collect();
    assert_eq!(pages, vec![2, 0, 3, 1]);
}

#[test]
fn space_runs_void_multi_term_queries() {
    let r = results(&engine(), "select   table");
    assert!(r.is_empty());
    assert!(r.first_link.is_none());
}

#[test]
fn unknown_letter_is_silent_but_unknown_term_says_so() {
    let engine = engine();
    assert!(results(&engine, "xz").is_empty());
    assert!(results(&engine, "create xml").is_empty());
    assert!(results(&engine, "sz").is_no_results());
    assert!(results(&engine, "select tutorial").is_no_results());
}

#[test]
fn blank_input_clears() {
    assert_eq!(engine().search(" ;; ", None).unwrap(), QueryOutcome::NoQuery);
}

#[test]
fn repeated_queries_are_identical() {
    let engine = engine();
    for q in ["s", "sel", "create table", "s t", "xz"] {
        assert_eq!(engine.search(q, None).unwrap(), engine.search(q, None).unwrap());
    }
}

#[test]
fn short_terms_are_capped_at_one_hundred_rows() {
    let engine = SearchEngine::with_index(wide_index(150, 1), SearchConfig::default());
    let r = results(&engine, "s");
    assert_eq!(r.instructions.len(), 100);
    assert_eq!(r.page_links().count(), 0);

    // Three characters lifts the cap; s0000..s0099 all match.
    let r = results(&engine, "s00");
    assert_eq!(r.instructions.len(), 100);
    assert!(r.first_link.is_none());
}

#[test]
fn cap_stops_inside_an_occurrence_list() {
    let engine = SearchEngine::with_index(wide_index(5, 30), SearchConfig::default());
    let r = results(&engine, "s");
    assert_eq!(r.instructions.len(), 100);
    assert_eq!(r.headers().count(), 4);
    assert_eq!(r.page_links().filter(|(_, t)| *t == "s0003").count(), 6);
}

#[test]
fn large_groups_collapse_until_expanded() {
    let engine = SearchEngine::with_index(wide_index(30, 50), SearchConfig::default());
    let collapsed = results(&engine, "s00");
    assert_eq!(collapsed.instructions.len(), 30);
    assert_eq!(collapsed.page_links().count(), 0);

    let QueryOutcome::Results(expanded) = engine.search("s00", Some("s0007")).unwrap() else {
        panic!("expected results");
    };
    assert_eq!(expanded.instructions.len(), 80);
    assert!(expanded.page_links().all(|(_, t)| t == "s0007"));
    assert_eq!(expanded.first_link.unwrap().term, "s0007");
}

#[test]
fn widget_paints_and_navigates() {
    let engine = engine();
    let mut widget = SearchWidget::new(&engine, RecordingSink::default());

    widget.on_input("sel").unwrap();
    assert!(widget.sink().clear_visible);
    assert_eq!(widget.sink().rows.len(), 5);

    let mut viewport = Viewport::at("http://docs/index.html");
    assert_eq!(
        widget.go_first(&mut viewport).unwrap(),
        Some(Navigation::Loaded("grammar.html?highlight=select".into()))
    );
    assert_eq!(widget.activate(2, "selection", &mut viewport).unwrap(), Navigation::Loaded("tutorial.html?highlight=selection".into()));

    let mut showing = Viewport::at("http://docs/tutorial.html");
    assert_eq!(widget.activate(2, "selection", &mut showing).unwrap(), Navigation::AlreadyShowing);

    widget.clear_input().unwrap();
    assert!(!widget.sink().clear_visible);
    assert!(widget.sink().rows.is_empty());
    assert!(widget.first_link().is_none());
    assert_eq!(widget.go_first(&mut viewport).unwrap(), None);
}

#[test]
fn widget_expands_a_collapsed_header() {
    let config = SearchConfig { disclosure_threshold: 2, ..SearchConfig::default() };
    let engine = SearchEngine::with_index(sample_index(), config);
    let mut widget = SearchWidget::new(&engine, RecordingSink::default());

    widget.on_input("s").unwrap();
    assert_eq!(widget.sink().rows.len(), 3);
    assert!(widget.first_link().is_none());

    widget.expand("sequence").unwrap();
    assert_eq!(
        widget.sink().rows,
        vec![
            Instruction::Header { term: "select".into() },
            Instruction::Header { term: "selection".into() },
            Instruction::Header { term: "sequence".into() },
            link(0, "sequence", "SQL Grammar"),
            link(3, "sequence", "Features"),
        ]
    );
    assert_eq!(widget.first_link().map(|l| l.page_id), Some(0));
    assert_eq!(widget.input(), "s");
}

#[test]
fn snapshot_and_feed_sources_agree() {
    let dir = tempdir().unwrap();
    let feed_path = dir.path().join("feed.json");
    fs::write(&feed_path, SAMPLE_FEED).unwrap();
    let snapshot_dir = dir.path().join("compiled");
    save_snapshot(&IndexPaths::new(&snapshot_dir), &sample_index()).unwrap();

    let meta = load_meta(&IndexPaths::new(&snapshot_dir)).unwrap();
    assert_eq!((meta.num_pages, meta.num_terms), (4, 6));

    let from_feed = SearchEngine::new(Box::new(FeedFile(feed_path)), SearchConfig::default());
    let from_snapshot = SearchEngine::new(source_for_path(&snapshot_dir), SearchConfig::default());
    assert!(!from_snapshot.is_loaded());
    for q in ["sel", "create table", "s t", "tut"] {
        assert_eq!(from_feed.search(q, None).unwrap(), from_snapshot.search(q, None).unwrap());
    }
    assert!(from_snapshot.is_loaded());
}

#[test]
fn snapshot_with_other_version_is_rejected() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    save_snapshot(&paths, &sample_index()).unwrap();
    save_meta(&paths, &MetaFile { num_pages: 4, num_terms: 6, created_at: String::new(), version: 99 }).unwrap();
    assert!(load_snapshot(&paths).is_err());
}

#[test]
fn missing_feed_surfaces_as_error() {
    let dir = tempdir().unwrap();
    let engine = SearchEngine::new(source_for_path(dir.path().join("nope.json")), SearchConfig::default());
    let err = engine.search("sel", None).unwrap_err();
    assert!(format!("{err:#}").contains("nope.json"));
}
