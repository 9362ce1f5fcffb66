//! In-memory keyword search over a precomputed documentation index.
//!
//! The index is a page table plus first-letter buckets of term postings. A raw
//! input value is normalized into one or more terms; a single term is answered
//! with a prefix search that collapses large result groups behind their term
//! headers, several terms with a weighted AND search over pages.

pub mod config;
pub mod emit;
pub mod engine;
pub mod error;
pub mod feed;
pub mod index;
pub mod multi;
pub mod navigate;
pub mod normalize;
pub mod persist;
pub mod single;
pub mod widget;

pub use config::{SearchConfig, Weights};
pub use emit::{FirstLink, Instruction, RenderSink, SearchResults};
pub use engine::{QueryOutcome, SearchEngine};
pub use error::FeedError;
pub use index::{FieldKind, Index, Occurrence, Page, PageId, Posting};
pub use multi::search_multi;
pub use navigate::{Navigation, NavigationTarget};
pub use normalize::{normalize, Query};
pub use single::search_single;
pub use widget::SearchWidget;
