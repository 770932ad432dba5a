use crate::reducers::Reducer;
use crate::row::Row;
use crate::types::Result;

/// Emits the group keys plus the group size.
///
/// A group whose key values are not all truthy is suppressed entirely.
/// Downstream pipelines rely on that filter to drop blank tokens, so it is
/// the default; [Count::keeping_falsy] emits every group.
pub struct Count {
    out: String,
    keep_falsy: bool,
}

impl Count {
    pub fn new(out: impl Into<String>) -> Self {
        Self {
            out: out.into(),
            keep_falsy: false,
        }
    }

    /// Count groups even when some key value is falsy (null, zero, empty).
    pub fn keeping_falsy(out: impl Into<String>) -> Self {
        Self {
            out: out.into(),
            keep_falsy: true,
        }
    }
}

impl Reducer for Count {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        let Some(first) = group.first() else {
            return Ok(vec![]);
        };
        let mut out = Row::new();
        for key in keys {
            let value = first.require(key)?.clone();
            if !self.keep_falsy && !value.is_truthy() {
                return Ok(vec![]);
            }
            out.set(key.as_str(), value);
        }
        out.set(self.out.as_str(), group.len() as i64);
        Ok(vec![out])
    }
}
