//! Counts words in the `text` column of a JSON-lines file:
//!
//! ```sh
//! cargo run --example word_count -- docs.jsonl
//! ```

use anyhow::Context;
use rowflow::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let path = std::env::args()
        .nth(1)
        .context("usage: word_count <docs.jsonl>")?;
    let graph = Graph::from_file(path, |line| Row::from_json_str(line))
        .map(FilterPunctuation::new("text"))
        .map(LowerCase::new("text"))
        .map(Split::new("text"))
        .sort(&["text"])
        .reduce(Count::new("count"), &["text"])
        .sort(&["count", "text"]);
    for row in graph.run(&Sources::new())? {
        println!("{}", serde_json::to_string(&row?)?);
    }
    Ok(())
}
