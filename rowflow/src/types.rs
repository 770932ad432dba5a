use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::row::Row;
use crate::sources::Sources;

/// A finite, single-pass lazy sequence of [Row]s.
///
/// Streams are consumed exactly once; operators never re-iterate an
/// upstream, they buffer explicitly where an algorithm demands it.  An
/// `Err` item is fatal: the stream ends there and nothing already yielded
/// is retracted.
pub type RowStream = Box<dyn Iterator<Item = Result<Row>>>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// `run` referenced a source name that no factory was supplied for.
    #[error("no source supplied for {0:?}")]
    NoSource(String),
    #[error("could not open {}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse line {line}: {message}")]
    Parse { line: u64, message: String },
    #[error("column {0:?} is missing")]
    KeyMissing(String),
    #[error("type error: {0}")]
    Type(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A source operator produces a stream from the runtime-supplied inputs.
/// Only source nodes ever see the [Sources].
pub trait SourceOp {
    fn open(&self, sources: &Sources) -> Result<RowStream>;
}

/// A unary operator transforms one upstream stream.
pub trait UnaryOp {
    fn apply(&self, input: RowStream) -> RowStream;
}

/// A binary operator consumes two upstream streams.
pub trait BinaryOp {
    fn apply(&self, left: RowStream, right: RowStream) -> RowStream;
}

/// The three operator arities.  Operators are plain values describing a
/// transform; they hold configuration only and can be invoked once per
/// downstream edge.  The executor dispatches on the arity.
pub enum Operator {
    Source(Box<dyn SourceOp>),
    Unary(Box<dyn UnaryOp>),
    Binary(Box<dyn BinaryOp>),
}
