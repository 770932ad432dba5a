//! Streaming merge-joins over co-sorted inputs.

mod inner;
mod left;
mod merge;
mod outer;
mod right;

pub use inner::InnerJoiner;
pub use left::LeftJoiner;
pub use outer::OuterJoiner;
pub use right::RightJoiner;

use std::rc::Rc;

use crate::types::{BinaryOp, RowStream};

/// Collision suffixes appended to overlapping non-key columns of the left
/// and right side respectively.  Key columns are never suffixed.
#[derive(Clone, Debug)]
pub struct Suffixes {
    pub left: String,
    pub right: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            left: "_1".into(),
            right: "_2".into(),
        }
    }
}

/// A join strategy over two inputs sorted by the same key tuple.
pub trait Joiner {
    fn join(&self, keys: &[String], left: RowStream, right: RowStream) -> RowStream;
}

/// Binary operation joining its two upstreams on a key tuple.  Both
/// upstreams must already be sorted by `keys`.
pub struct Join {
    joiner: Rc<dyn Joiner>,
    keys: Vec<String>,
}

impl Join {
    pub fn new(joiner: impl Joiner + 'static, keys: &[&str]) -> Self {
        Self {
            joiner: Rc::new(joiner),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl BinaryOp for Join {
    fn apply(&self, left: RowStream, right: RowStream) -> RowStream {
        self.joiner.join(&self.keys, left, right)
    }
}
