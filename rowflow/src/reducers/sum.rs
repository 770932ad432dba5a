use crate::reducers::Reducer;
use crate::row::{Row, Value};
use crate::types::Result;

/// Sums one column across the group, emitting the group keys plus the
/// total under the same column name.
pub struct Sum {
    column: String,
}

impl Sum {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Reducer for Sum {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        let Some(first) = group.first() else {
            return Ok(vec![]);
        };
        let mut out = Row::new();
        for key in keys {
            out.set(key.as_str(), first.require(key)?.clone());
        }
        let mut total = Value::Int(0);
        for row in &group {
            total = total.checked_add(row.require(&self.column)?)?;
        }
        out.set(self.column.as_str(), total);
        Ok(vec![out])
    }
}
