use smallvec::smallvec;

use crate::mappers::{Mapped, Mapper};
use crate::row::Row;
use crate::types::Result;

/// Keeps only the listed columns.  Listed columns that are absent from a
/// row are skipped, not invented.
pub struct Project {
    columns: Vec<String>,
}

impl Project {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Mapper for Project {
    fn map(&self, mut row: Row) -> Result<Mapped> {
        let mut out = Row::new();
        for column in &self.columns {
            if let Some(value) = row.remove(column) {
                out.set(column.as_str(), value);
            }
        }
        Ok(smallvec![out])
    }
}
