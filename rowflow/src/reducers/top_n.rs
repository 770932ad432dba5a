use crate::reducers::Reducer;
use crate::row::{Row, Value};
use crate::types::Result;

/// Emits the up-to-n rows of the group with the largest values in one
/// column, in descending order.  Ties keep input order; full rows are
/// preserved.
pub struct TopN {
    column: String,
    n: usize,
}

impl TopN {
    pub fn new(column: impl Into<String>, n: usize) -> Self {
        Self {
            column: column.into(),
            n,
        }
    }
}

impl Reducer for TopN {
    fn reduce(&self, _keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        let mut keyed: Vec<(Value, Row)> = group
            .into_iter()
            .map(|row| Ok((row.require(&self.column)?.clone(), row)))
            .collect::<Result<_>>()?;
        // stable descending sort keeps ties in input order
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(keyed
            .into_iter()
            .take(self.n)
            .map(|(_, row)| row)
            .collect())
    }
}
