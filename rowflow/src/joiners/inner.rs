use crate::joiners::merge::MergeJoinStream;
use crate::joiners::{Joiner, Suffixes};
use crate::types::RowStream;

/// Emits key-matched pairs only; rows without a match on the other side
/// are dropped.
#[derive(Debug, Default)]
pub struct InnerJoiner {
    suffixes: Suffixes,
}

impl InnerJoiner {
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

impl Joiner for InnerJoiner {
    fn join(&self, keys: &[String], left: RowStream, right: RowStream) -> RowStream {
        Box::new(MergeJoinStream::new(
            keys.to_vec(),
            self.suffixes.clone(),
            false,
            false,
            left,
            right,
        ))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::row::Row;
    use crate::sources::rows_stream;

    #[test]
    fn collision_columns_are_suffixed() {
        let left = vec![
            Row::new().with("k", 1i64).with("v", "a"),
            Row::new().with("k", 2i64).with("v", "b"),
        ];
        let right = vec![
            Row::new().with("k", 1i64).with("v", "x"),
            Row::new().with("k", 1i64).with("v", "y"),
            Row::new().with("k", 3i64).with("v", "z"),
        ];
        let keys = vec!["k".to_string()];
        let out: Vec<Row> = InnerJoiner::new()
            .join(&keys, rows_stream(left), rows_stream(right))
            .map(|row| row.unwrap())
            .collect();
        assert_eq!(
            out,
            vec![
                Row::new().with("k", 1i64).with("v_1", "a").with("v_2", "x"),
                Row::new().with("k", 1i64).with("v_1", "a").with("v_2", "y"),
            ]
        );
    }

    #[test]
    fn custom_suffixes() {
        let left = vec![Row::new().with("k", 1i64).with("v", "a")];
        let right = vec![Row::new().with("k", 1i64).with("v", "x")];
        let keys = vec!["k".to_string()];
        let out: Vec<Row> = InnerJoiner::with_suffixes("_a", "_b")
            .join(&keys, rows_stream(left), rows_stream(right))
            .map(|row| row.unwrap())
            .collect();
        assert_eq!(out[0].str("v_a").unwrap(), "a");
        assert_eq!(out[0].str("v_b").unwrap(), "x");
    }
}
