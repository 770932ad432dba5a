//! The streaming block-merge-join shared by every join strategy.

use derive_new::new;
use std::cmp::Ordering;

use crate::joiners::Suffixes;
use crate::row::{Key, Row};
use crate::types::{Result, RowStream};

/// Streaming merge-join over two inputs sorted by the same key tuple.
///
/// Two cursors advance through the inputs.  A key present on one side only
/// is an unmatched row, emitted as-is or dropped depending on the strategy
/// flags.  When the keys meet, the right-side block of equal keys is
/// buffered (only that side, and only one block at a time) and the left
/// rows of the block stream against it, cross-emitting every pair.  An
/// empty key list compares equal everywhere, so the whole right side forms
/// one block and the join is a cross product.
#[derive(new)]
pub(crate) struct MergeJoinStream {
    keys: Vec<String>,
    suffixes: Suffixes,
    /// emit left rows with no right-side match (left/outer)
    keep_left: bool,
    /// emit right rows with no left-side match (right/outer)
    keep_right: bool,
    left: RowStream,
    right: RowStream,
    #[new(default)]
    peeked_left: Option<(Key, Row)>,
    #[new(default)]
    peeked_right: Option<(Key, Row)>,
    #[new(default)]
    block: Vec<Row>,
    #[new(default)]
    block_key: Option<Key>,
    /// left row currently crossing the block, and its position in it
    #[new(default)]
    cross: Option<(Row, usize)>,
    #[new(default)]
    primed: bool,
    #[new(default)]
    failed: bool,
}

enum Step {
    LeftOnly,
    RightOnly,
    Matched,
}

impl MergeJoinStream {
    fn advance_left(&mut self) -> Result<Row> {
        let (_, row) = self.peeked_left.take().expect("left cursor is empty");
        self.peeked_left = pull(&mut self.left, &self.keys)?;
        Ok(row)
    }

    fn advance_right(&mut self) -> Result<Row> {
        let (_, row) = self.peeked_right.take().expect("right cursor is empty");
        self.peeked_right = pull(&mut self.right, &self.keys)?;
        Ok(row)
    }

    fn step(&mut self) -> Result<Option<Row>> {
        if !self.primed {
            self.primed = true;
            self.peeked_left = pull(&mut self.left, &self.keys)?;
            self.peeked_right = pull(&mut self.right, &self.keys)?;
        }
        loop {
            // emit the remaining pairs for the left row being crossed
            if let Some((row, position)) = &mut self.cross {
                if *position < self.block.len() {
                    let pair = merge_rows(&self.keys, &self.suffixes, row, &self.block[*position]);
                    *position += 1;
                    return Ok(Some(pair));
                }
                self.cross = None;
            }
            // inside an equal-key run: feed the next left row into the block
            if let Some(block_key) = &self.block_key {
                let next_matches = matches!(&self.peeked_left, Some((key, _)) if key == block_key);
                if next_matches {
                    let row = self.advance_left()?;
                    self.cross = Some((row, 0));
                    continue;
                }
                self.block.clear();
                self.block_key = None;
            }
            let step = match (&self.peeked_left, &self.peeked_right) {
                (None, None) => return Ok(None),
                (Some(_), None) => Step::LeftOnly,
                (None, Some(_)) => Step::RightOnly,
                (Some((left_key, _)), Some((right_key, _))) => match left_key.cmp(right_key) {
                    Ordering::Less => Step::LeftOnly,
                    Ordering::Greater => Step::RightOnly,
                    Ordering::Equal => Step::Matched,
                },
            };
            match step {
                Step::LeftOnly => {
                    let row = self.advance_left()?;
                    if self.keep_left {
                        return Ok(Some(row));
                    }
                }
                Step::RightOnly => {
                    let row = self.advance_right()?;
                    if self.keep_right {
                        return Ok(Some(row));
                    }
                }
                Step::Matched => {
                    let (key, row) = self.peeked_right.take().expect("matched right cursor");
                    self.peeked_right = pull(&mut self.right, &self.keys)?;
                    self.block.push(row);
                    while let Some((next_key, _)) = &self.peeked_right {
                        if *next_key != key {
                            break;
                        }
                        let row = self.advance_right()?;
                        self.block.push(row);
                    }
                    self.block_key = Some(key);
                }
            }
        }
    }
}

impl Iterator for MergeJoinStream {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.step() {
            Ok(row) => row.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Pulls one row together with its key tuple.  A key column absent from a
/// row is an error: sorted inputs are expected to carry every key.
fn pull(stream: &mut RowStream, keys: &[String]) -> Result<Option<(Key, Row)>> {
    match stream.next() {
        None => Ok(None),
        Some(Err(err)) => Err(err),
        Some(Ok(row)) => {
            let key = row.key_tuple(keys)?;
            Ok(Some((key, row)))
        }
    }
}

/// Merges one matched pair.  Overlapping non-key columns get the collision
/// suffixes; key columns appear once with their shared value.
fn merge_rows(keys: &[String], suffixes: &Suffixes, left: &Row, right: &Row) -> Row {
    let mut out = Row::new();
    for (column, value) in left.iter() {
        if !keys.contains(column) && right.contains(column) {
            out.set(format!("{column}{}", suffixes.left), value.clone());
        } else {
            out.set(column.as_str(), value.clone());
        }
    }
    for (column, value) in right.iter() {
        if keys.contains(column) {
            continue;
        }
        if left.contains(column) {
            out.set(format!("{column}{}", suffixes.right), value.clone());
        } else {
            out.set(column.as_str(), value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::row::Value;
    use crate::sources::rows_stream;
    use crate::types::Error;

    fn keys() -> Vec<String> {
        vec!["k".to_string()]
    }

    fn merge(keep_left: bool, keep_right: bool, left: Vec<Row>, right: Vec<Row>) -> Vec<Row> {
        MergeJoinStream::new(
            keys(),
            Suffixes::default(),
            keep_left,
            keep_right,
            rows_stream(left),
            rows_stream(right),
        )
        .map(|row| row.unwrap())
        .collect()
    }

    fn kv(pairs: &[(i64, &str)]) -> Vec<Row> {
        pairs
            .iter()
            .map(|(k, v)| Row::new().with("k", *k).with("v", *v))
            .collect()
    }

    #[test]
    fn equal_key_blocks_cross_product() {
        let left = kv(&[(1, "a"), (1, "b")]);
        let right = kv(&[(1, "x"), (1, "y"), (1, "z")]);
        let out = merge(false, false, left, right);
        assert_eq!(out.len(), 6);
        assert_eq!(out[0].str("v_1").unwrap(), "a");
        assert_eq!(out[0].str("v_2").unwrap(), "x");
        assert_eq!(out[5].str("v_1").unwrap(), "b");
        assert_eq!(out[5].str("v_2").unwrap(), "z");
    }

    #[test]
    fn empty_keys_join_everything_with_everything() {
        let left = kv(&[(1, "a"), (2, "b")]);
        let right = kv(&[(9, "x")]);
        let out = MergeJoinStream::new(
            Vec::new(),
            Suffixes::default(),
            false,
            false,
            rows_stream(left),
            rows_stream(right),
        )
        .map(|row| row.unwrap())
        .collect::<Vec<_>>();
        // k collides too: it is not a key column here
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].i64("k_1").unwrap(), 1);
        assert_eq!(out[0].i64("k_2").unwrap(), 9);
        assert_eq!(out[1].i64("k_1").unwrap(), 2);
    }

    #[test]
    fn null_keys_match_null_keys() {
        let left = vec![
            Row::new().with("k", Value::Null).with("l", 1i64),
            Row::new().with("k", 3i64).with("l", 2i64),
        ];
        let right = vec![
            Row::new().with("k", Value::Null).with("r", 10i64),
            Row::new().with("k", 3i64).with("r", 20i64),
        ];
        let out = merge(false, false, left, right);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("k"), Some(&Value::Null));
        assert_eq!(out[0].i64("l").unwrap(), 1);
        assert_eq!(out[0].i64("r").unwrap(), 10);
    }

    #[test]
    fn unmatched_sides_follow_the_flags() {
        let left = kv(&[(1, "a"), (2, "b")]);
        let right = kv(&[(2, "x"), (3, "y")]);
        let inner = merge(false, false, left.clone(), right.clone());
        assert_eq!(inner.len(), 1);
        let outer = merge(true, true, left.clone(), right.clone());
        assert_eq!(outer.len(), 3);
        assert_eq!(outer[0], left[0]);
        assert_eq!(outer[2], right[1]);
    }

    #[test]
    fn one_empty_input() {
        let rows = kv(&[(1, "a")]);
        assert!(merge(false, false, kv(&[]), rows.clone()).is_empty());
        assert_eq!(merge(true, false, rows.clone(), kv(&[])), rows);
        assert_eq!(merge(false, true, kv(&[]), rows.clone()), rows);
    }

    #[test]
    fn missing_join_key_is_fatal() {
        let left = vec![Row::new().with("other", 1i64)];
        let right = kv(&[(1, "x")]);
        let mut stream = MergeJoinStream::new(
            keys(),
            Suffixes::default(),
            false,
            false,
            rows_stream(left),
            rows_stream(right),
        );
        assert!(matches!(stream.next(), Some(Err(Error::KeyMissing(_)))));
        assert!(stream.next().is_none());
    }
}
