use smallvec::smallvec;

use crate::mappers::{Mapped, Mapper};
use crate::row::Row;
use crate::types::Result;

/// Keeps rows satisfying the supplied predicate.
pub struct Filter {
    predicate: Box<dyn Fn(&Row) -> bool>,
}

impl Filter {
    pub fn new(predicate: impl Fn(&Row) -> bool + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl Mapper for Filter {
    fn map(&self, row: Row) -> Result<Mapped> {
        if (self.predicate)(&row) {
            Ok(smallvec![row])
        } else {
            Ok(Mapped::new())
        }
    }
}
