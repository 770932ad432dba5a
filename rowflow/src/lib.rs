#![warn(clippy::perf)]
#![allow(clippy::type_complexity)]

//! Graph based row stream processing toolkit.
//!
//! A pipeline over streams of structured rows is composed declaratively as
//! an immutable [Graph] -- read, map, sort, reduce, join -- and executed
//! against named row sources, producing a lazy stream of result [Row]s.
//! Evaluation is single-threaded cooperative pull: rows flow one at a time
//! through each operator chain, and memory use is bounded by the buffers
//! the operators keep (reducer groups, join blocks, sort chunks).
//!
//! ```rust
//! use rowflow::*;
//!
//! fn main() {
//!     let graph = Graph::from_iter("docs")
//!         .map(FilterPunctuation::new("text"))
//!         .map(LowerCase::new("text"))
//!         .map(Split::new("text"))
//!         .sort(&["text"])
//!         .reduce(Count::new("count"), &["text"])
//!         .sort(&["count", "text"]);
//!     let docs = vec![
//!         Row::from_json_str(r#"{"doc_id": 1, "text": "To be, or not to be"}"#).unwrap(),
//!     ];
//!     let sources = Sources::new().with_rows("docs", docs);
//!     for row in graph.run(&sources).unwrap() {
//!         println!("{}", serde_json::to_string(&row.unwrap()).unwrap());
//!     }
//! }
//! ```
//!
//! Reducers and joiners require their upstreams to be sorted by the
//! grouping keys; pipelines insert [sort](Graph::sort) explicitly.  The
//! sort is external (it spills to temp run files beyond a bounded chunk)
//! and stable, which is what makes sorted groups contiguous and the
//! streaming merge-joins correct.

#[macro_use]
extern crate log;

mod graph;
mod joiners;
mod mappers;
mod reducers;
mod row;
mod sort;
mod sources;
mod types;

pub use graph::*;
pub use joiners::*;
pub use mappers::*;
pub use reducers::*;
pub use row::*;
pub use sort::*;
pub use sources::*;
pub use types::*;
