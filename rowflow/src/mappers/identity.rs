use derive_new::new;
use smallvec::smallvec;

use crate::mappers::{Mapped, Mapper};
use crate::row::Row;
use crate::types::Result;

/// Yields the input row unchanged.
#[derive(new, Debug, Default)]
pub struct Identity;

impl Mapper for Identity {
    fn map(&self, row: Row) -> Result<Mapped> {
        Ok(smallvec![row])
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn identity_is_an_identity() {
        let row = Row::new().with("a", 1i64).with("b", "x");
        let mapped = Identity.map(row.clone()).unwrap();
        assert_eq!(mapped.as_slice(), &[row]);
    }
}
