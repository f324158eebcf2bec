//! Append-only JSON-lines score file.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use tui_fliptris::engine::{rank, ScoreEntry, ScoreStore};
use tui_fliptris::types::GameMode;

/// One `ScoreEntry` per line
#[derive(Debug, Clone)]
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &ScoreEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        file.write_all(&line)?;
        Ok(())
    }

    /// Every readable entry; malformed lines are skipped
    pub fn load(&self) -> Result<Vec<ScoreEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        Ok(text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }

    /// Best `limit` entries of one mode
    pub fn top(&self, mode: GameMode, limit: usize) -> Result<Vec<ScoreEntry>> {
        let mut entries: Vec<_> = self.load()?.into_iter().filter(|e| e.mode == mode).collect();
        rank(&mut entries);
        entries.truncate(limit);
        Ok(entries)
    }
}

impl ScoreStore for JsonLinesStore {
    fn record(&mut self, entry: ScoreEntry) {
        if let Err(err) = self.append(&entry) {
            warn!(path = %self.path.display(), error = %err, "failed to save score");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(mode: GameMode, score: u32, elapsed_ms: u64, won: bool) -> ScoreEntry {
        ScoreEntry {
            mode,
            score,
            lines: 0,
            level: 0,
            elapsed_ms,
            won,
            seed: 1,
        }
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fliptris-{}-{}.jsonl", name, std::process::id()))
    }

    #[test]
    fn test_append_then_top() {
        let path = scratch_path("top");
        let _ = fs::remove_file(&path);
        let mut store = JsonLinesStore::new(&path);
        store.record(entry(GameMode::Marathon, 300, 10, false));
        store.record(entry(GameMode::Marathon, 900, 20, false));
        store.record(entry(GameMode::Garbage, 50, 5_000, true));
        store.record(entry(GameMode::Garbage, 80, 3_000, true));

        let marathon = store.top(GameMode::Marathon, 5).unwrap();
        assert_eq!(marathon.iter().map(|e| e.score).collect::<Vec<_>>(), vec![900, 300]);

        let garbage = store.top(GameMode::Garbage, 1).unwrap();
        assert_eq!(garbage[0].elapsed_ms, 3_000);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_empty_and_bad_lines_skip() {
        let path = scratch_path("bad");
        let _ = fs::remove_file(&path);
        let store = JsonLinesStore::new(&path);
        assert!(store.load().unwrap().is_empty());

        fs::write(&path, "not json\n\n").unwrap();
        store.append(&entry(GameMode::Sirtet, 7, 1, false)).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
        let _ = fs::remove_file(&path);
    }
}
