//! Named runtime inputs and the source operators that read them.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::rc::Rc;

use crate::row::Row;
use crate::types::{Error, Result, RowStream, SourceOp};

type SourceFactory = Box<dyn Fn() -> RowStream>;

/// The named inputs of one [run](crate::Graph::run): zero-argument stream
/// factories keyed by source name.
///
/// A factory can be invoked more than once; a graph node feeding several
/// downstream edges is re-run once per edge, re-reading the named input.
#[derive(Default)]
pub struct Sources {
    factories: HashMap<String, SourceFactory>,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stream factory under `name`.
    pub fn with(
        mut self,
        name: impl Into<String>,
        factory: impl Fn() -> RowStream + 'static,
    ) -> Self {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    /// Convenience for in-memory fixtures: the rows are cloned on every
    /// open.
    pub fn with_rows(self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.with(name, move || rows_stream(rows.clone()))
    }

    pub fn open(&self, name: &str) -> Result<RowStream> {
        match self.factories.get(name) {
            Some(factory) => Ok(factory()),
            None => Err(Error::NoSource(name.to_string())),
        }
    }
}

/// Wraps an in-memory batch of rows as a [RowStream].
pub fn rows_stream(rows: Vec<Row>) -> RowStream {
    Box::new(rows.into_iter().map(Ok))
}

/// Source that reads the runtime input registered under `name`.
pub struct FromIter {
    name: String,
}

impl FromIter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SourceOp for FromIter {
    fn open(&self, sources: &Sources) -> Result<RowStream> {
        trace!("opening source {:?}", self.name);
        sources.open(&self.name)
    }
}

/// Source that reads a text file line by line through a caller-supplied
/// parser.  The file handle lives as long as the stream.
pub struct FromFile {
    path: PathBuf,
    parser: Rc<dyn Fn(&str) -> Result<Row>>,
}

impl FromFile {
    pub fn new(path: impl Into<PathBuf>, parser: impl Fn(&str) -> Result<Row> + 'static) -> Self {
        Self {
            path: path.into(),
            parser: Rc::new(parser),
        }
    }
}

impl SourceOp for FromFile {
    fn open(&self, _sources: &Sources) -> Result<RowStream> {
        let file = File::open(&self.path).map_err(|source| Error::FileOpen {
            path: self.path.clone(),
            source,
        })?;
        debug!("reading rows from {:?}", self.path);
        let parser = self.parser.clone();
        let lines = BufReader::new(file).lines();
        Ok(Box::new(lines.enumerate().map(move |(index, line)| {
            let line = line?;
            parser(&line).map_err(|err| match err {
                // parsers usually don't know which line they are on
                Error::Parse { message, .. } => Error::Parse {
                    line: index as u64 + 1,
                    message,
                },
                other => other,
            })
        })))
    }
}
