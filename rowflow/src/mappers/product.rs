use smallvec::smallvec;

use crate::mappers::{Mapped, Mapper};
use crate::row::{Row, Value};
use crate::types::Result;

/// Emits the row extended with the product of the named columns.  An empty
/// column list gives 1.
pub struct Product {
    columns: Vec<String>,
    out: String,
}

impl Product {
    pub fn new(columns: &[&str], out: impl Into<String>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            out: out.into(),
        }
    }
}

impl Mapper for Product {
    fn map(&self, mut row: Row) -> Result<Mapped> {
        let mut product = Value::Int(1);
        for column in &self.columns {
            product = product.checked_mul(row.require(column)?)?;
        }
        row.set(self.out.as_str(), product);
        Ok(smallvec![row])
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::types::Error;

    #[test]
    fn multiplies_the_named_columns() {
        let row = Row::new().with("a", 3i64).with("b", 0.5).with("c", 4i64);
        let mapped = Product::new(&["a", "b"], "p").map(row).unwrap();
        assert_eq!(mapped[0].f64("p").unwrap(), 1.5);
        assert_eq!(mapped[0].i64("c").unwrap(), 4);
    }

    #[test]
    fn empty_column_list_gives_one() {
        let mapped = Product::new(&[], "p").map(Row::new()).unwrap();
        assert_eq!(mapped[0].get("p"), Some(&Value::Int(1)));
    }

    #[test]
    fn non_numeric_columns_are_an_error() {
        let row = Row::new().with("a", "three");
        let err = Product::new(&["a"], "p").map(row).unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }
}
