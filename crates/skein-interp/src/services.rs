// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Injectable host services.
//!
//! The interpreter's boundary collaborators are traits so a run can be
//! driven with real stdin/stdout/disk or with captured test doubles.

use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::Rng;

/// Provider for the `@IN` control tag. May block until a line arrives.
pub trait InputSource {
    /// The next input line without its trailing newline, or `None` when
    /// the source is exhausted.
    fn read_line(&mut self) -> Option<String>;
}

/// Destination for `send … to @OUT`.
pub trait OutputSink {
    fn write_line(&mut self, text: &str);
}

/// Marker for an append target that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

/// Append-only file destination for `send … to f#path`.
pub trait FileStore {
    /// Append `text` to the file at `path`; the file must already exist.
    fn append(&mut self, path: &Path, text: &str) -> Result<(), NotFound>;
}

/// Provider for the `@RAND` control tag.
pub trait RandomSource {
    /// A uniform integer in `[min, max]` inclusive. Callers guarantee
    /// `min <= max`.
    fn uniform(&mut self, min: i64, max: i64) -> i64;
}

// --- production implementations ---

/// Blocking stdin lines.
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
        }
    }
}

/// Line-buffered stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Appends to real files on disk.
#[derive(Debug, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn append(&mut self, path: &Path, text: &str) -> Result<(), NotFound> {
        if !path.exists() {
            return Err(NotFound);
        }
        let appended = std::fs::OpenOptions::new()
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(text.as_bytes()));
        // A file that vanished between the check and the open reads the
        // same to the script as one that never existed.
        appended.map_err(|_| NotFound)
    }
}

/// `rand`-backed uniform integers.
#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&mut self, min: i64, max: i64) -> i64 {
        rand::thread_rng().gen_range(min..=max)
    }
}

// --- test doubles, also useful for embedding ---

/// Pre-scripted input lines.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}

/// Captures output lines instead of printing them.
#[derive(Debug, Default)]
pub struct BufferSink {
    pub lines: Vec<String>,
}

impl OutputSink for BufferSink {
    fn write_line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

/// In-memory files; only pre-created paths accept appends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub files: HashMap<PathBuf, String>,
}

impl MemoryStore {
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), String::new());
        self
    }
}

impl FileStore for MemoryStore {
    fn append(&mut self, path: &Path, text: &str) -> Result<(), NotFound> {
        match self.files.get_mut(path) {
            Some(contents) => {
                contents.push_str(text);
                Ok(())
            }
            None => Err(NotFound),
        }
    }
}

/// Replays a fixed sequence, then repeats the minimum bound.
#[derive(Debug, Default)]
pub struct SequenceRandom {
    values: VecDeque<i64>,
}

impl SequenceRandom {
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn uniform(&mut self, min: i64, max: i64) -> i64 {
        match self.values.pop_front() {
            Some(v) => v.clamp(min, max),
            None => min,
        }
    }
}

// Shared handles let tests keep a view of what a running interpreter
// wrote after handing the service over.

impl OutputSink for std::sync::Arc<std::sync::Mutex<Vec<String>>> {
    fn write_line(&mut self, text: &str) {
        if let Ok(mut lines) = self.lock() {
            lines.push(text.to_string());
        }
    }
}

impl FileStore for std::sync::Arc<std::sync::Mutex<MemoryStore>> {
    fn append(&mut self, path: &Path, text: &str) -> Result<(), NotFound> {
        match self.lock() {
            Ok(mut store) => store.append(path, text),
            Err(_) => Err(NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_requires_precreated_files() {
        let mut store = MemoryStore::default().with_file("/tmp/log");
        assert_eq!(store.append(Path::new("/tmp/log"), "a"), Ok(()));
        assert_eq!(store.append(Path::new("/tmp/log"), "b"), Ok(()));
        assert_eq!(store.files[Path::new("/tmp/log")], "ab");
        assert_eq!(store.append(Path::new("/tmp/other"), "x"), Err(NotFound));
    }

    #[test]
    fn scripted_input_drains_then_ends() {
        let mut input = ScriptedInput::new(["one", "two"]);
        assert_eq!(input.read_line().as_deref(), Some("one"));
        assert_eq!(input.read_line().as_deref(), Some("two"));
        assert_eq!(input.read_line(), None);
    }

    #[test]
    fn buffer_sink_captures_lines_in_order() {
        let mut sink = BufferSink::default();
        sink.write_line("a");
        sink.write_line("b");
        assert_eq!(sink.lines, ["a", "b"]);
    }

    #[test]
    fn thread_random_stays_in_bounds() {
        let mut random = ThreadRandom;
        for _ in 0..50 {
            let n = random.uniform(2, 5);
            assert!((2..=5).contains(&n));
        }
        assert_eq!(random.uniform(1, 1), 1);
    }
}
