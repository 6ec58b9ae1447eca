//! Out-of-core sorting for link streams.
//!
//! [`ExternalSorter`] keeps at most `chunk_size` records in memory: larger
//! inputs are sorted chunk by chunk, each chunk spilled to a temporary file
//! as JSON lines, then merged back with a k-way heap merge. Inputs that fit
//! in a single chunk never touch disk.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Seek, Write};
use std::mem;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Result;

/// Default number of records held in memory before a chunk is spilled.
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Sorts a stream by a key function, yielding the same records back in
/// ascending key order.
///
/// Implementations must keep memory usage independent of the total stream
/// size; anything meeting the ordering contract is substitutable. Ties are
/// broken deterministically, but callers must not rely on a specific tie
/// order. Input items are `Result`s so that upstream read errors abort the
/// sort instead of being dropped at the barrier.
pub trait Sorter {
    fn sort_by_key<T, K, F>(
        &self,
        input: impl IntoIterator<Item = Result<T>>,
        key: F,
    ) -> Result<impl Iterator<Item = Result<T>>>
    where
        T: Serialize + DeserializeOwned,
        K: Ord,
        F: Fn(&T) -> K;
}

/// Plain in-memory sort. Substitutable wherever a [`Sorter`] is expected;
/// useful for tests and small batches.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemorySorter;

impl Sorter for MemorySorter {
    fn sort_by_key<T, K, F>(
        &self,
        input: impl IntoIterator<Item = Result<T>>,
        key: F,
    ) -> Result<impl Iterator<Item = Result<T>>>
    where
        T: Serialize + DeserializeOwned,
        K: Ord,
        F: Fn(&T) -> K,
    {
        let items = input.into_iter().collect::<Result<Vec<T>>>()?;
        Ok(sort_chunk(items, &key).into_iter().map(Ok))
    }
}

#[derive(Debug, Clone)]
pub struct ExternalSorter {
    chunk_size: usize,
    spill_dir: Option<PathBuf>,
}

impl Default for ExternalSorter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ExternalSorter {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            spill_dir: None,
        }
    }

    /// Spill runs into `dir` instead of the system temp directory.
    pub fn with_spill_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spill_dir = Some(dir.into());
        self
    }

    fn spill<T, K, F>(&self, chunk: Vec<T>, key: &F) -> Result<File>
    where
        T: Serialize,
        K: Ord,
        F: Fn(&T) -> K,
    {
        let sorted = sort_chunk(chunk, key);
        let mut file = match &self.spill_dir {
            Some(dir) => tempfile::tempfile_in(dir)?,
            None => tempfile::tempfile()?,
        };
        {
            let mut writer = BufWriter::new(&mut file);
            for item in &sorted {
                serde_json::to_writer(&mut writer, item)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        file.rewind()?;
        debug!("spilled sorted run of {} records", sorted.len());
        Ok(file)
    }
}

impl Sorter for ExternalSorter {
    fn sort_by_key<T, K, F>(
        &self,
        input: impl IntoIterator<Item = Result<T>>,
        key: F,
    ) -> Result<impl Iterator<Item = Result<T>>>
    where
        T: Serialize + DeserializeOwned,
        K: Ord,
        F: Fn(&T) -> K,
    {
        let mut runs: Vec<File> = Vec::new();
        let mut chunk: Vec<T> = Vec::new();
        for item in input {
            chunk.push(item?);
            if chunk.len() >= self.chunk_size {
                runs.push(self.spill(mem::take(&mut chunk), &key)?);
            }
        }

        if runs.is_empty() {
            return Ok(SortedStream::Memory(sort_chunk(chunk, &key).into_iter()));
        }
        if !chunk.is_empty() {
            runs.push(self.spill(mem::take(&mut chunk), &key)?);
        }
        debug!("merging {} sorted runs", runs.len());
        Ok(SortedStream::Merged(KWayMerge::new(runs, key)?))
    }
}

/// Decorate once with the key, sort, undecorate. Avoids re-running the key
/// function on every comparison.
fn sort_chunk<T, K, F>(chunk: Vec<T>, key: &F) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut keyed: Vec<(K, T)> = chunk.into_iter().map(|item| (key(&item), item)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, item)| item).collect()
}

enum SortedStream<T, K, F> {
    Memory(std::vec::IntoIter<T>),
    Merged(KWayMerge<T, K, F>),
}

impl<T, K, F> Iterator for SortedStream<T, K, F>
where
    T: DeserializeOwned,
    K: Ord,
    F: Fn(&T) -> K,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SortedStream::Memory(iter) => iter.next().map(Ok),
            SortedStream::Merged(merge) => merge.next(),
        }
    }
}

struct MergeEntry<T, K> {
    key: K,
    run: usize,
    item: T,
}

impl<T, K: Ord> PartialEq for MergeEntry<T, K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, K: Ord> Eq for MergeEntry<T, K> {}

impl<T, K: Ord> PartialOrd for MergeEntry<T, K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, K: Ord> Ord for MergeEntry<T, K> {
    // run index as secondary key keeps merges deterministic on equal keys
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.run.cmp(&other.run))
    }
}

struct KWayMerge<T, K, F> {
    runs: Vec<Lines<BufReader<File>>>,
    heap: BinaryHeap<Reverse<MergeEntry<T, K>>>,
    key: F,
    failed: bool,
}

impl<T, K, F> KWayMerge<T, K, F>
where
    T: DeserializeOwned,
    K: Ord,
    F: Fn(&T) -> K,
{
    fn new(files: Vec<File>, key: F) -> Result<Self> {
        let mut merge = Self {
            runs: files
                .into_iter()
                .map(|file| BufReader::new(file).lines())
                .collect(),
            heap: BinaryHeap::new(),
            key,
            failed: false,
        };
        for run in 0..merge.runs.len() {
            merge.refill(run)?;
        }
        Ok(merge)
    }

    fn refill(&mut self, run: usize) -> Result<()> {
        if let Some(line) = self.runs[run].next() {
            let item: T = serde_json::from_str(&line?)?;
            let key = (self.key)(&item);
            self.heap.push(Reverse(MergeEntry { key, run, item }));
        }
        Ok(())
    }
}

impl<T, K, F> Iterator for KWayMerge<T, K, F>
where
    T: DeserializeOwned,
    K: Ord,
    F: Fn(&T) -> K,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let Reverse(entry) = self.heap.pop()?;
        match self.refill(entry.run) {
            Ok(()) => Some(Ok(entry.item)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
