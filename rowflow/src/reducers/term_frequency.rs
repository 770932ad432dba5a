use std::collections::BTreeMap;

use crate::reducers::Reducer;
use crate::row::{Row, Value};
use crate::types::Result;

/// Emits, per distinct value of the words column, the group keys plus that
/// value's frequency within the group.  Distinct values appear in
/// first-occurrence order.
pub struct TermFrequency {
    words_column: String,
    out: String,
}

impl TermFrequency {
    pub fn new(words_column: impl Into<String>) -> Self {
        Self::with_output(words_column, "tf")
    }

    pub fn with_output(words_column: impl Into<String>, out: impl Into<String>) -> Self {
        Self {
            words_column: words_column.into(),
            out: out.into(),
        }
    }
}

impl Reducer for TermFrequency {
    fn reduce(&self, keys: &[String], group: Vec<Row>) -> Result<Vec<Row>> {
        let Some(first) = group.first() else {
            return Ok(vec![]);
        };
        let mut prefix = Row::new();
        for key in keys {
            prefix.set(key.as_str(), first.require(key)?.clone());
        }
        let mut counts: BTreeMap<Value, usize> = BTreeMap::new();
        let mut order: Vec<Value> = Vec::new();
        for row in &group {
            let word = row.require(&self.words_column)?;
            match counts.get_mut(word) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(word.clone(), 1);
                    order.push(word.clone());
                }
            }
        }
        let total = group.len() as f64;
        let mut out = Vec::with_capacity(order.len());
        for word in order {
            let count = counts.remove(&word).unwrap_or(0);
            let mut row = prefix.clone();
            row.set(self.words_column.as_str(), word);
            row.set(self.out.as_str(), count as f64 / total);
            out.push(row);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn words(doc: i64, words: &[&str]) -> Vec<Row> {
        words
            .iter()
            .map(|w| Row::new().with("doc_id", doc).with("text", *w))
            .collect()
    }

    #[test]
    fn frequencies_in_first_occurrence_order() {
        let keys = vec!["doc_id".to_string()];
        let group = words(1, &["hello", "little", "hello", "hello"]);
        let reduced = TermFrequency::new("text").reduce(&keys, group).unwrap();
        assert_eq!(
            reduced,
            vec![
                Row::new().with("doc_id", 1i64).with("text", "hello").with("tf", 0.75),
                Row::new().with("doc_id", 1i64).with("text", "little").with("tf", 0.25),
            ]
        );
    }

    #[test]
    fn frequencies_sum_to_one() {
        let keys: Vec<String> = vec![];
        let group = words(1, &["a", "b", "a", "c", "b", "a", "d"]);
        let reduced = TermFrequency::new("text").reduce(&keys, group).unwrap();
        let total: f64 = reduced.iter().map(|r| r.f64("tf").unwrap()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}
