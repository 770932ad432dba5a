use crate::joiners::merge::MergeJoinStream;
use crate::joiners::{Joiner, Suffixes};
use crate::types::RowStream;

/// Emits every left row: matched rows cross with their right-side block,
/// unmatched rows pass through with the right-side columns absent.
#[derive(Debug, Default)]
pub struct LeftJoiner {
    suffixes: Suffixes,
}

impl LeftJoiner {
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

impl Joiner for LeftJoiner {
    fn join(&self, keys: &[String], left: RowStream, right: RowStream) -> RowStream {
        Box::new(MergeJoinStream::new(
            keys.to_vec(),
            self.suffixes.clone(),
            true,
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
    fn unmatched_left_rows_survive() {
        let left = vec![
            Row::new().with("k", 1i64).with("l", "a"),
            Row::new().with("k", 2i64).with("l", "b"),
        ];
        let right = vec![Row::new().with("k", 2i64).with("r", "x")];
        let keys = vec!["k".to_string()];
        let out: Vec<Row> = LeftJoiner::new()
            .join(&keys, rows_stream(left), rows_stream(right))
            .map(|row| row.unwrap())
            .collect();
        assert_eq!(
            out,
            vec![
                Row::new().with("k", 1i64).with("l", "a"),
                Row::new().with("k", 2i64).with("l", "b").with("r", "x"),
            ]
        );
    }

    #[test]
    fn empty_right_input_keeps_all_left_rows() {
        let left = vec![Row::new().with("k", 1i64).with("l", "a")];
        let keys = vec!["k".to_string()];
        let out: Vec<Row> = LeftJoiner::new()
            .join(&keys, rows_stream(left.clone()), rows_stream(vec![]))
            .map(|row| row.unwrap())
            .collect();
        assert_eq!(out, left);
    }
}
