#![allow(dead_code)]

use docsearch_core::feed::IndexFeed;
use docsearch_core::Index;

pub const SAMPLE_FEED: &str = r#"{
    "pages": [
        {"file": "grammar.html", "title": "SQL Grammar"},
        {"file": "functions.html", "title": "Functions"},
        {"file": "tutorial.html", "title": "Tutorial"},
        {"file": "features.html", "title": "Features"}
    ],
    "buckets": {
        "s": "select=r0,r1;selection=t2;sequence=h0,r3",
        "c": "create=h3,r0",
        "t": "table=h3,r0,r1;tutorial=t2"
    }
}"#;

pub fn sample_index() -> Index {
    IndexFeed::from_json(SAMPLE_FEED).unwrap().decode().unwrap()
}

/// An index whose `s` bucket holds `count` postings `s0000`, `s0001`, ... each
/// with `per_term` reference occurrences spread over ten pages.
pub fn wide_index(count: usize, per_term: usize) -> Index {
    let pages: Vec<String> = (0..10).map(|i| format!(r#"{{"file":"p{i}.html","title":"Page {i}"}}"#)).collect();
    let postings: Vec<String> = (0..count)
        .map(|t| {
            let occ: Vec<String> = (0..per_term).map(|k| format!("r{}", (t + k) % 10)).collect();
            format!("s{t:04}={}", occ.join(","))
        })
        .collect();
    let json = format!(r#"{{"pages":[{}],"buckets":{{"s":"{}"}}}}"#, pages.join(","), postings.join(";"));
    IndexFeed::from_json(&json).unwrap().decode().unwrap()
}
