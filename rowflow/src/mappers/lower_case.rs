use smallvec::smallvec;

use crate::mappers::{Mapped, Mapper};
use crate::row::Row;
use crate::types::Result;

/// Lowercases the string in a column.
pub struct LowerCase {
    column: String,
}

impl LowerCase {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Mapper for LowerCase {
    fn map(&self, mut row: Row) -> Result<Mapped> {
        let lowered = row.str(&self.column)?.to_lowercase();
        row.set(self.column.as_str(), lowered);
        Ok(smallvec![row])
    }
}
