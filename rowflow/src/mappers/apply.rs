use smallvec::smallvec;

use crate::mappers::{Mapped, Mapper};
use crate::row::{Row, Value};
use crate::types::Result;

/// Emits the row extended with the result of an arbitrary function of the
/// row.  The generic escape hatch for one-off derived columns.
pub struct Apply {
    func: Box<dyn Fn(&Row) -> Result<Value>>,
    out: String,
}

impl Apply {
    pub fn new(func: impl Fn(&Row) -> Result<Value> + 'static, out: impl Into<String>) -> Self {
        Self {
            func: Box::new(func),
            out: out.into(),
        }
    }
}

impl Mapper for Apply {
    fn map(&self, mut row: Row) -> Result<Mapped> {
        let value = (self.func)(&row)?;
        row.set(self.out.as_str(), value);
        Ok(smallvec![row])
    }
}
