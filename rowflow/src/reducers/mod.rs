//! Grouped aggregations and the [Reduce] operation that drives them.

mod count;
mod first;
mod sum;
mod term_frequency;
mod top_n;

pub use count::Count;
pub use first::First;
pub use sum::Sum;
pub use term_frequency::TermFrequency;
pub use top_n::TopN;

use derive_new::new;
use std::rc::Rc;

use crate::row::{Key, Row};
use crate::types::{Result, RowStream, UnaryOp};

/// An aggregation over one group of rows sharing a key tuple.
pub trait Reducer {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>>;
}

/// Unary operation partitioning a key-sorted stream into maximal contiguous
/// runs of equal key tuple and applying a [Reducer] to each run.
///
/// The upstream must already be sorted by `keys` (pipelines insert
/// [sort](crate::Graph::sort) explicitly).  One group is buffered at a
/// time; output ordering follows input group order.  An empty key list
/// makes the whole stream one group.
pub struct Reduce {
    reducer: Rc<dyn Reducer>,
    keys: Vec<String>,
}

impl Reduce {
    pub fn new(reducer: impl Reducer + 'static, keys: &[&str]) -> Self {
        Self {
            reducer: Rc::new(reducer),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl UnaryOp for Reduce {
    fn apply(&self, input: RowStream) -> RowStream {
        Box::new(ReduceStream::new(
            self.reducer.clone(),
            self.keys.clone(),
            input,
        ))
    }
}

#[derive(new)]
struct ReduceStream {
    reducer: Rc<dyn Reducer>,
    keys: Vec<String>,
    input: RowStream,
    #[new(default)]
    lookahead: Option<(Key, Row)>,
    #[new(default)]
    emitted: std::vec::IntoIter<Row>,
    #[new(default)]
    started: bool,
    #[new(default)]
    failed: bool,
}

impl ReduceStream {
    fn fail(&mut self, err: crate::types::Error) -> Option<Result<Row>> {
        self.failed = true;
        Some(Err(err))
    }

    /// Pulls one upstream row together with its key tuple.
    fn pull(&mut self) -> Result<Option<(Key, Row)>> {
        match self.input.next() {
            None => Ok(None),
            Some(Err(err)) => Err(err),
            Some(Ok(row)) => {
                let key = row.key_tuple(&self.keys)?;
                Ok(Some((key, row)))
            }
        }
    }
}

impl Iterator for ReduceStream {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            if let Some(row) = self.emitted.next() {
                return Some(Ok(row));
            }
            if !self.started {
                self.started = true;
                match self.pull() {
                    Ok(first) => self.lookahead = first,
                    Err(err) => return self.fail(err),
                }
            }
            // gather the next maximal run of equal keys
            let (key, first) = self.lookahead.take()?;
            let mut group = vec![first];
            loop {
                match self.pull() {
                    Ok(None) => break,
                    Ok(Some((next_key, row))) => {
                        if next_key == key {
                            group.push(row);
                        } else {
                            self.lookahead = Some((next_key, row));
                            break;
                        }
                    }
                    Err(err) => return self.fail(err),
                }
            }
            match self.reducer.reduce(&self.keys, group) {
                Ok(rows) => self.emitted = rows.into_iter(),
                Err(err) => return self.fail(err),
            }
        }
    }
}
