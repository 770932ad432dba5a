//! Row-to-rows transforms and the [Map] operation that drives them.

mod apply;
mod filter;
mod filter_punctuation;
mod haversine;
mod identity;
mod lower_case;
mod product;
mod project;
mod split;
mod travel_time;

pub use apply::Apply;
pub use filter::Filter;
pub use filter_punctuation::FilterPunctuation;
pub use haversine::HaversineDistance;
pub use identity::Identity;
pub use lower_case::LowerCase;
pub use product::Product;
pub use project::Project;
pub use split::Split;
pub use travel_time::TravelTimeParts;

use derive_new::new;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::row::Row;
use crate::types::{Result, RowStream, UnaryOp};

/// Rows emitted by a single [Mapper] invocation.  Most mappers emit exactly
/// one row, so the first slot lives inline.
pub type Mapped = SmallVec<[Row; 1]>;

/// A 1-row to 0..N-rows transform.
pub trait Mapper {
    fn map(&self, row: Row) -> Result<Mapped>;
}

/// Unary operation applying a [Mapper] to every upstream row.
pub struct Map {
    mapper: Rc<dyn Mapper>,
}

impl Map {
    pub fn new(mapper: impl Mapper + 'static) -> Self {
        Self {
            mapper: Rc::new(mapper),
        }
    }
}

impl UnaryOp for Map {
    fn apply(&self, input: RowStream) -> RowStream {
        Box::new(MapStream::new(self.mapper.clone(), input))
    }
}

#[derive(new)]
struct MapStream {
    mapper: Rc<dyn Mapper>,
    input: RowStream,
    #[new(default)]
    pending: VecDeque<Row>,
    #[new(default)]
    failed: bool,
}

impl Iterator for MapStream {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            if let Some(row) = self.pending.pop_front() {
                return Some(Ok(row));
            }
            match self.input.next()? {
                Ok(row) => match self.mapper.map(row) {
                    Ok(mapped) => self.pending.extend(mapped),
                    Err(err) => {
                        self.failed = true;
                        return Some(Err(err));
                    }
                },
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
