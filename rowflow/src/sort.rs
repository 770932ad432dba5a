//! Disk-spilling stable sort.

use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Lines, Write};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::row::{Key, Row};
use crate::types::{Result, RowStream, UnaryOp};

/// Rows held in memory per sorted run.
const DEFAULT_CHUNK_ROWS: usize = 64 * 1024;

/// External merge sort: emits the upstream rows stably ordered by the
/// ascending key tuple.
///
/// Input is consumed in bounded chunks; each chunk is stably sorted in
/// memory.  When the input fits in one chunk nothing touches disk.
/// Otherwise every chunk is spilled to a JSON-lines run file in a fresh
/// temp directory and the runs are merged lazily through a min-heap keyed
/// by (key tuple, run index); the run index breaks ties, so rows with
/// equal keys keep their input order.  The temp directory is removed when
/// the output stream is exhausted or dropped.
pub struct Sort {
    keys: Vec<String>,
    chunk_rows: usize,
    temp_dir: Option<PathBuf>,
}

impl Sort {
    pub fn new(keys: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            chunk_rows: DEFAULT_CHUNK_ROWS,
            temp_dir: None,
        }
    }

    /// Override the in-memory chunk size (rows per spilled run).
    pub fn with_chunk_rows(mut self, chunk_rows: usize) -> Self {
        self.chunk_rows = chunk_rows.max(1);
        self
    }

    /// Put run files under `dir` instead of the system temp directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}

impl UnaryOp for Sort {
    fn apply(&self, input: RowStream) -> RowStream {
        Box::new(SortStream {
            keys: self.keys.clone(),
            chunk_rows: self.chunk_rows,
            temp_dir: self.temp_dir.clone(),
            state: State::Pending(input),
        })
    }
}

enum State {
    /// Input not consumed yet; sorting happens on the first pull.
    Pending(RowStream),
    Memory(std::vec::IntoIter<Row>),
    Merging(RunMerge),
    Done,
}

struct SortStream {
    keys: Vec<String>,
    chunk_rows: usize,
    temp_dir: Option<PathBuf>,
    state: State,
}

impl SortStream {
    fn build(&mut self, mut input: RowStream) -> Result<State> {
        let mut chunk: Vec<(Key, Row)> = Vec::new();
        let mut dir: Option<TempDir> = None;
        let mut runs: Vec<PathBuf> = Vec::new();
        loop {
            match input.next() {
                None => break,
                Some(Err(err)) => return Err(err),
                Some(Ok(row)) => {
                    let key = row.key_tuple(&self.keys)?;
                    chunk.push((key, row));
                    if chunk.len() >= self.chunk_rows {
                        sort_chunk(&mut chunk);
                        let dir = self.spill_dir(&mut dir)?;
                        runs.push(spill(dir, runs.len(), &chunk)?);
                        chunk.clear();
                    }
                }
            }
        }
        sort_chunk(&mut chunk);
        if runs.is_empty() {
            debug!("sorted {} rows in memory", chunk.len());
            let rows: Vec<Row> = chunk.into_iter().map(|(_, row)| row).collect();
            return Ok(State::Memory(rows.into_iter()));
        }
        if !chunk.is_empty() {
            let dir = self.spill_dir(&mut dir)?;
            runs.push(spill(dir, runs.len(), &chunk)?);
        }
        debug!("merging {} sorted runs", runs.len());
        match dir {
            Some(dir) => Ok(State::Merging(RunMerge::open(dir, runs, self.keys.clone())?)),
            None => Ok(State::Done),
        }
    }

    fn spill_dir<'a>(&self, dir: &'a mut Option<TempDir>) -> Result<&'a TempDir> {
        if dir.is_none() {
            let created = match &self.temp_dir {
                Some(parent) => TempDir::with_prefix_in("rowflow-sort-", parent)?,
                None => TempDir::with_prefix("rowflow-sort-")?,
            };
            debug!("spilling sort runs under {:?}", created.path());
            *dir = Some(created);
        }
        Ok(dir.as_ref().expect("spill dir created above"))
    }
}

impl Iterator for SortStream {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Pending(input) => match self.build(input) {
                    Ok(state) => self.state = state,
                    // temp files are already gone: the TempDir handle
                    // drops before the error leaves build
                    Err(err) => return Some(Err(err)),
                },
                State::Memory(mut rows) => match rows.next() {
                    Some(row) => {
                        self.state = State::Memory(rows);
                        return Some(Ok(row));
                    }
                    None => return None,
                },
                State::Merging(mut merge) => match merge.next_row() {
                    Ok(Some(row)) => {
                        self.state = State::Merging(merge);
                        return Some(Ok(row));
                    }
                    Ok(None) => return None,
                    Err(err) => return Some(Err(err)),
                },
                State::Done => return None,
            }
        }
    }
}

fn sort_chunk(chunk: &mut [(Key, Row)]) {
    chunk.sort_by(|a, b| a.0.cmp(&b.0));
}

fn spill(dir: &TempDir, index: usize, chunk: &[(Key, Row)]) -> Result<PathBuf> {
    let path = dir.path().join(format!("run-{index:04}.jsonl"));
    let mut writer = BufWriter::new(File::create(&path)?);
    for (_, row) in chunk {
        serde_json::to_writer(&mut writer, row).map_err(io::Error::from)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    trace!("spilled {} rows to {:?}", chunk.len(), path);
    Ok(path)
}

/// Lazy k-way merge over spilled runs.  Holding the [TempDir] ties the run
/// files' lifetime to the merge: dropping the stream mid-way still removes
/// them.
struct RunMerge {
    _dir: TempDir,
    keys: Vec<String>,
    runs: Vec<Lines<BufReader<File>>>,
    front: Vec<Option<Row>>,
    heap: PriorityQueue<usize, Reverse<(Key, usize)>>,
}

impl RunMerge {
    fn open(dir: TempDir, paths: Vec<PathBuf>, keys: Vec<String>) -> Result<RunMerge> {
        let mut merge = RunMerge {
            _dir: dir,
            keys,
            runs: Vec::with_capacity(paths.len()),
            front: Vec::with_capacity(paths.len()),
            heap: PriorityQueue::new(),
        };
        for (run, path) in paths.iter().enumerate() {
            merge.runs.push(BufReader::new(File::open(path)?).lines());
            merge.front.push(None);
            merge.advance(run)?;
        }
        Ok(merge)
    }

    /// Reads the next row of `run` into its front slot and re-queues it.
    fn advance(&mut self, run: usize) -> Result<()> {
        if let Some(line) = self.runs[run].next() {
            let row: Row = serde_json::from_str(&line?).map_err(io::Error::from)?;
            let key = row.key_tuple(&self.keys)?;
            self.front[run] = Some(row);
            self.heap.push(run, Reverse((key, run)));
        }
        Ok(())
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        let Some((run, _)) = self.heap.pop() else {
            return Ok(None);
        };
        let row = self.front[run].take();
        debug_assert!(row.is_some(), "popped run {run} with an empty front");
        self.advance(run)?;
        Ok(row)
    }
}
