use crate::joiners::merge::MergeJoinStream;
use crate::joiners::{Joiner, Suffixes};
use crate::types::RowStream;

/// Emits every row of both sides: matched rows cross, unmatched rows pass
/// through with the other side's columns absent.  Uses the same streaming
/// merge as the other strategies, so only one right-side block is ever
/// buffered.
#[derive(Debug, Default)]
pub struct OuterJoiner {
    suffixes: Suffixes,
}

impl OuterJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suffixes(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            suffixes: Suffixes {
                left: left.into(),
                right: right.into(),
            },
        }
    }
}

impl Joiner for OuterJoiner {
    fn join(&self, keys: &[String], left: RowStream, right: RowStream) -> RowStream {
        Box::new(MergeJoinStream::new(
            keys.to_vec(),
            self.suffixes.clone(),
            true,
            true,
            left,
            right,
        ))
    }
}
