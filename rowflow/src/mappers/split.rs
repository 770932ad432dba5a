use regex::Regex;
use smallvec::smallvec;

use crate::mappers::{Mapped, Mapper};
use crate::row::{Row, Value};
use crate::types::{Error, Result};

/// Splits a column by a regex separator, yielding one row per non-empty
/// trimmed token, each a copy of the input row with the column replaced.
/// Rows without the column pass through unchanged.
pub struct Split {
    column: String,
    separator: Regex,
}

impl Split {
    /// Split on runs of whitespace.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            separator: Regex::new(r"\s+").expect("static whitespace regex"),
        }
    }

    /// Split on an explicit regex separator.  An invalid pattern is an
    /// error, not a panic.
    pub fn with_separator(column: impl Into<String>, separator: &str) -> Result<Self> {
        let separator = Regex::new(separator)
            .map_err(|err| Error::Type(format!("invalid separator regex {separator:?}: {err}")))?;
        Ok(Self {
            column: column.into(),
            separator,
        })
    }
}

impl Mapper for Split {
    fn map(&self, row: Row) -> Result<Mapped> {
        let Some(value) = row.get(&self.column) else {
            return Ok(smallvec![row]);
        };
        let Value::Str(text) = value else {
            return Err(Error::Type(format!(
                "cannot split {value} in column {:?}",
                self.column
            )));
        };
        let mut out = Mapped::new();
        for token in self.separator.split(text) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let mut copy = row.clone();
            copy.set(self.column.as_str(), token);
            out.push(copy);
        }
        Ok(out)
    }
}
