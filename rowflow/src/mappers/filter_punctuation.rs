use smallvec::smallvec;

use crate::mappers::{Mapped, Mapper};
use crate::row::Row;
use crate::types::Result;

/// Removes ASCII punctuation characters from the string in a column.
pub struct FilterPunctuation {
    column: String,
}

impl FilterPunctuation {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Mapper for FilterPunctuation {
    fn map(&self, mut row: Row) -> Result<Mapped> {
        let filtered: String = row
            .str(&self.column)?
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();
        row.set(self.column.as_str(), filtered);
        Ok(smallvec![row])
    }
}
