use std::path::PathBuf;
use std::rc::Rc;

use crate::joiners::{Join, Joiner};
use crate::mappers::{Map, Mapper};
use crate::reducers::{Reduce, Reducer};
use crate::row::Row;
use crate::sort::Sort;
use crate::sources::{FromFile, FromIter, Sources};
use crate::types::{Operator, Result, RowStream, SourceOp, UnaryOp};

/// An immutable node in the dataflow DAG: an operator plus its 0, 1 or 2
/// upstream graphs.
///
/// Builder methods are pure: they allocate a new node and never touch
/// existing ones, so any node can feed several downstream graphs.  Such a
/// shared node is re-run once per edge; sources are referenced by name, so
/// re-running just re-reads the named input.
///
/// ```rust
/// use rowflow::*;
///
/// let words = Graph::from_iter("docs")
///     .map(LowerCase::new("text"))
///     .map(Split::new("text"))
///     .sort(&["text"])
///     .reduce(Count::new("count"), &["text"]);
/// ```
#[derive(Clone)]
pub struct Graph {
    node: Rc<Node>,
}

struct Node {
    op: Operator,
    upstreams: Vec<Graph>,
}

impl Graph {
    fn source(op: impl SourceOp + 'static) -> Graph {
        Graph {
            node: Rc::new(Node {
                op: Operator::Source(Box::new(op)),
                upstreams: Vec::new(),
            }),
        }
    }

    fn unary(&self, op: impl UnaryOp + 'static) -> Graph {
        Graph {
            node: Rc::new(Node {
                op: Operator::Unary(Box::new(op)),
                upstreams: vec![self.clone()],
            }),
        }
    }

    /// Source reading the runtime input registered under `name` in the
    /// [Sources] passed to [run](Graph::run).
    pub fn from_iter(name: impl Into<String>) -> Graph {
        Graph::source(FromIter::new(name))
    }

    /// Source reading `path` line by line through `parser`.
    pub fn from_file(
        path: impl Into<PathBuf>,
        parser: impl Fn(&str) -> Result<Row> + 'static,
    ) -> Graph {
        Graph::source(FromFile::new(path, parser))
    }

    /// Extends the graph with a [Map] of `mapper` over every row.
    pub fn map(&self, mapper: impl Mapper + 'static) -> Graph {
        self.unary(Map::new(mapper))
    }

    /// Extends the graph with a [Reduce] of `reducer` over groups of
    /// `keys`.  The upstream must be sorted by `keys`; insert
    /// [sort](Graph::sort) explicitly.
    pub fn reduce(&self, reducer: impl Reducer + 'static, keys: &[&str]) -> Graph {
        self.unary(Reduce::new(reducer, keys))
    }

    /// Extends the graph with an external stable [Sort] by `keys`.
    pub fn sort(&self, keys: &[&str]) -> Graph {
        self.unary(Sort::new(keys))
    }

    /// Extends the graph with a [Join] of self (left) and `other` (right)
    /// on `keys`.  Both sides must be sorted by `keys`.
    pub fn join(&self, joiner: impl Joiner + 'static, other: &Graph, keys: &[&str]) -> Graph {
        Graph {
            node: Rc::new(Node {
                op: Operator::Binary(Box::new(Join::new(joiner, keys))),
                upstreams: vec![self.clone(), other.clone()],
            }),
        }
    }

    /// Executes the graph against the named inputs, pulling upstreams
    /// recursively, and returns the lazy output stream.  Evaluation is
    /// single-threaded; rows flow one at a time through each chain.
    pub fn run(&self, sources: &Sources) -> Result<RowStream> {
        match &self.node.op {
            Operator::Source(op) => op.open(sources),
            Operator::Unary(op) => Ok(op.apply(self.node.upstreams[0].run(sources)?)),
            Operator::Binary(op) => {
                let left = self.node.upstreams[0].run(sources)?;
                let right = self.node.upstreams[1].run(sources)?;
                Ok(op.apply(left, right))
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::mappers::{FilterPunctuation, Identity, LowerCase, Split};
    use crate::reducers::Count;
    use crate::types::Error;

    fn row(value: serde_json::Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    fn run_to_vec(graph: &Graph, sources: &Sources) -> Vec<Row> {
        graph
            .run(sources)
            .unwrap()
            .map(|row| row.unwrap())
            .collect()
    }

    #[test]
    fn word_count_end_to_end() {
        let docs = vec![
            row(serde_json::json!({"doc_id": 1, "text": "hello, my little WORLD"})),
            row(serde_json::json!({"doc_id": 2, "text": "Hello, my little little hell"})),
        ];
        let graph = Graph::from_iter("docs")
            .map(FilterPunctuation::new("text"))
            .map(LowerCase::new("text"))
            .map(Split::new("text"))
            .sort(&["text"])
            .reduce(Count::new("count"), &["text"])
            .sort(&["count", "text"]);
        let counted = run_to_vec(&graph, &Sources::new().with_rows("docs", docs));
        assert_eq!(
            counted,
            vec![
                row(serde_json::json!({"count": 1, "text": "hell"})),
                row(serde_json::json!({"count": 1, "text": "world"})),
                row(serde_json::json!({"count": 2, "text": "hello"})),
                row(serde_json::json!({"count": 2, "text": "my"})),
                row(serde_json::json!({"count": 3, "text": "little"})),
            ]
        );
    }

    #[test]
    fn identity_map_changes_nothing() {
        let rows = vec![
            row(serde_json::json!({"a": 1})),
            row(serde_json::json!({"a": 2})),
        ];
        let graph = Graph::from_iter("rows").map(Identity);
        let out = run_to_vec(&graph, &Sources::new().with_rows("rows", rows.clone()));
        assert_eq!(out, rows);
    }

    #[test]
    fn missing_source_fails_at_run_time() {
        let graph = Graph::from_iter("absent").map(Identity);
        match graph.run(&Sources::new()) {
            Err(Error::NoSource(name)) => assert_eq!(name, "absent"),
            other => panic!("expected NoSource, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn one_reduction_per_distinct_key_after_sorting() {
        let rows: Vec<Row> = [3, 1, 2, 3, 1, 1, 2]
            .iter()
            .map(|k| row(serde_json::json!({"k": k})))
            .collect();
        let graph = Graph::from_iter("rows")
            .sort(&["k"])
            .reduce(Count::new("n"), &["k"]);
        let out = run_to_vec(&graph, &Sources::new().with_rows("rows", rows));
        assert_eq!(
            out,
            vec![
                row(serde_json::json!({"k": 1, "n": 3})),
                row(serde_json::json!({"k": 2, "n": 2})),
                row(serde_json::json!({"k": 3, "n": 2})),
            ]
        );
    }

    #[test]
    fn shared_nodes_are_rerun_per_edge() {
        use crate::joiners::InnerJoiner;
        use crate::reducers::Sum;

        let rows = vec![
            row(serde_json::json!({"k": 1, "a": 2})),
            row(serde_json::json!({"k": 1, "a": 3})),
        ];
        let base = Graph::from_iter("rows").sort(&["k"]);
        // both joins pull from `base`; each edge re-reads the source
        let sums = base.reduce(Sum::new("a"), &["k"]);
        let joined = base.join(InnerJoiner::new(), &sums, &["k"]);
        let out = run_to_vec(&joined, &Sources::new().with_rows("rows", rows));
        assert_eq!(
            out,
            vec![
                row(serde_json::json!({"k": 1, "a_1": 2, "a_2": 5})),
                row(serde_json::json!({"k": 1, "a_1": 3, "a_2": 5})),
            ]
        );
    }
}
