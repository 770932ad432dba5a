use derive_new::new;

use crate::reducers::Reducer;
use crate::row::Row;
use crate::types::Result;

/// Emits the first row of each group.
#[derive(new, Debug, Default)]
pub struct First;

impl Reducer for First {
    fn reduce(&self, _keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        Ok(group.into_iter().take(1).collect())
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn keeps_the_first_row_only() {
        let group = vec![
            Row::new().with("k", 1i64).with("v", "a"),
            Row::new().with("k", 1i64).with("v", "b"),
        ];
        let keys = vec!["k".to_string()];
        let reduced = First.reduce(&keys, group.clone()).unwrap();
        assert_eq!(reduced, vec![group[0].clone()]);
    }
}
