use crate::joiners::merge::MergeJoinStream;
use crate::joiners::{Joiner, Suffixes};
use crate::types::RowStream;

/// Emits every right row: matched rows cross with the left side, unmatched
/// rows pass through with the left-side columns absent.
#[derive(Debug, Default)]
pub struct RightJoiner {
    suffixes: Suffixes,
}

impl RightJoiner {
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

impl Joiner for RightJoiner {
    fn join(&self, keys: &[String], left: RowStream, right: RowStream) -> RowStream {
        Box::new(MergeJoinStream::new(
            keys.to_vec(),
            self.suffixes.clone(),
            false,
            true,
            left,
            right,
        ))
    }
}
