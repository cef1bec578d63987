//! Session persistence.
//!
//! The active workout lives in a single JSON file that is atomically replaced
//! on every save. Completed workouts are appended to a JSON Lines history file
//! under an exclusive file lock.

use crate::{Error, Result, WorkoutSession};
use fs2::FileExt;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

pub const ACTIVE_FILE: &str = "active_session.json";
pub const HISTORY_FILE: &str = "history.jsonl";

/// Durable storage for the active session and the session history
pub trait SessionStore {
    fn load_active(&self) -> Result<Option<WorkoutSession>>;
    fn save_active(&mut self, session: &WorkoutSession) -> Result<()>;
    fn clear_active(&mut self) -> Result<()>;
    fn append_history(&mut self, session: &WorkoutSession) -> Result<()>;
    /// Completed sessions, oldest first, without duplicate ids
    fn list_history(&self) -> Result<Vec<WorkoutSession>>;
    fn remove_history(&mut self, id: Uuid) -> Result<bool>;
}

// ============================================================================
// File store
// ============================================================================

/// File-backed session store rooted at a data directory
pub struct FileSessionStore {
    dir: PathBuf,
    write_retries: u32,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_retries: crate::config::StorageConfig::default().write_retries,
        }
    }

    /// Number of extra attempts made after a failed write
    pub fn with_write_retries(mut self, retries: u32) -> Self {
        self.write_retries = retries;
        self
    }

    pub fn active_path(&self) -> PathBuf {
        self.dir.join(ACTIVE_FILE)
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn with_retries<T>(&self, what: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.write_retries => {
                    attempt += 1;
                    tracing::warn!("{} failed (attempt {}): {}. Retrying", what, attempt, e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Atomically replace `path` with `contents`:
    /// write a temp file in the same directory, sync it, rename it over.
    fn replace_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.ensure_dir()?;

        let temp = NamedTempFile::new_in(&self.dir)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(contents)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    fn read_locked(path: &Path) -> Result<String> {
        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        Ok(contents)
    }

    /// Move an unreadable active file out of the way so it can be inspected
    /// later instead of being overwritten by the next save.
    fn quarantine(&self, path: &Path) {
        let target = path.with_extension("json.corrupt");
        match std::fs::rename(path, &target) {
            Ok(()) => tracing::warn!("Moved unreadable active session to {:?}", target),
            Err(e) => tracing::warn!("Failed to move unreadable {:?} aside: {}", path, e),
        }
    }

    /// Append one JSONL record to a locked history file.
    ///
    /// A failed write is truncated back to the previous length so a retry
    /// starts on a clean line. A trailing partial line left by an earlier
    /// crash is closed off first.
    fn append_line(file: &mut File, line: &[u8]) -> Result<()> {
        let prev_len = file.metadata()?.len();

        let mut record = Vec::with_capacity(line.len() + 1);
        if prev_len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::Start(prev_len - 1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                tracing::warn!("History ends with a partial line; starting a new one");
                record.push(b'\n');
            }
        }
        record.extend_from_slice(line);

        let written = file
            .write_all(&record)
            .and_then(|_| file.flush())
            .and_then(|_| file.sync_data());
        if let Err(e) = written {
            if let Err(trunc) = file.set_len(prev_len) {
                tracing::warn!("Failed to roll back partial history write: {}", trunc);
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Raw history lines, blank lines dropped
    fn history_lines(&self) -> Result<Vec<String>> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut lines = Vec::new();
        for line in BufReader::new(&file).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    let _ = file.unlock();
                    return Err(e.into());
                }
            };
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }

        file.unlock()?;
        Ok(lines)
    }
}

impl SessionStore for FileSessionStore {
    fn load_active(&self) -> Result<Option<WorkoutSession>> {
        let path = self.active_path();
        let contents = match Self::read_locked(&path) {
            Ok(contents) => contents,
            // Another process may clear the file at any time
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No active session file at {:?}", path);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        match serde_json::from_str::<WorkoutSession>(&contents) {
            Ok(session) => {
                tracing::debug!("Loaded active session {} from {:?}", session.id, path);
                Ok(Some(session))
            }
            Err(e) => {
                tracing::warn!("Failed to parse active session {:?}: {}", path, e);
                self.quarantine(&path);
                Ok(None)
            }
        }
    }

    fn save_active(&mut self, session: &WorkoutSession) -> Result<()> {
        let path = self.active_path();
        let contents = serde_json::to_vec(session)?;
        self.with_retries("Saving active session", || {
            self.replace_file(&path, &contents)
        })?;
        tracing::debug!("Saved active session {} to {:?}", session.id, path);
        Ok(())
    }

    fn clear_active(&mut self) -> Result<()> {
        let path = self.active_path();
        self.with_retries("Clearing active session", || match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        })?;
        tracing::debug!("Cleared active session at {:?}", path);
        Ok(())
    }

    fn append_history(&mut self, session: &WorkoutSession) -> Result<()> {
        let path = self.history_path();
        let mut line = serde_json::to_vec(session)?;
        line.push(b'\n');

        self.with_retries("Appending to history", || {
            self.ensure_dir()?;
            let mut file = OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(&path)?;
            file.lock_exclusive()?;

            let result = Self::append_line(&mut file, &line);
            file.unlock()?;
            result
        })?;

        tracing::debug!("Appended session {} to history", session.id);
        Ok(())
    }

    fn list_history(&self) -> Result<Vec<WorkoutSession>> {
        let mut sessions = Vec::new();
        let mut seen_ids = HashSet::new();

        for (line_num, line) in self.history_lines()?.iter().enumerate() {
            match serde_json::from_str::<WorkoutSession>(line) {
                Ok(session) => {
                    if seen_ids.insert(session.id) {
                        sessions.push(session);
                    } else {
                        tracing::debug!("Skipping duplicate history entry {}", session.id);
                    }
                }
                Err(e) => {
                    // Continue reading, don't fail completely
                    tracing::warn!("Failed to parse history at line {}: {}", line_num + 1, e);
                }
            }
        }

        sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        tracing::debug!("Read {} sessions from history", sessions.len());
        Ok(sessions)
    }

    fn remove_history(&mut self, id: Uuid) -> Result<bool> {
        let lines = self.history_lines()?;
        let before = lines.len();

        // Unparseable lines are kept verbatim; only the matching entry goes.
        let kept: Vec<&String> = lines
            .iter()
            .filter(|line| {
                serde_json::from_str::<WorkoutSession>(line)
                    .map(|s| s.id != id)
                    .unwrap_or(true)
            })
            .collect();

        if kept.len() == before {
            return Ok(false);
        }

        let mut contents = Vec::new();
        for line in kept {
            contents.extend_from_slice(line.as_bytes());
            contents.push(b'\n');
        }

        let path = self.history_path();
        self.with_retries("Rewriting history", || self.replace_file(&path, &contents))?;
        tracing::info!("Removed session {} from history", id);
        Ok(true)
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-process store. Write failures can be injected to exercise error paths.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    active: Option<WorkoutSession>,
    history: Vec<WorkoutSession>,
    failing_writes: u32,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the history, e.g. for analytics tests
    pub fn with_history(history: Vec<WorkoutSession>) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    /// Make the next `count` write operations fail with a storage error
    pub fn fail_next_writes(&mut self, count: u32) {
        self.failing_writes = count;
    }

    fn check_write(&mut self) -> Result<()> {
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(Error::Storage("injected write failure".into()));
        }
        Ok(())
    }
}

impl SessionStore for MemorySessionStore {
    fn load_active(&self) -> Result<Option<WorkoutSession>> {
        Ok(self.active.clone())
    }

    fn save_active(&mut self, session: &WorkoutSession) -> Result<()> {
        self.check_write()?;
        self.active = Some(session.clone());
        Ok(())
    }

    fn clear_active(&mut self) -> Result<()> {
        self.check_write()?;
        self.active = None;
        Ok(())
    }

    fn append_history(&mut self, session: &WorkoutSession) -> Result<()> {
        self.check_write()?;
        self.history.push(session.clone());
        Ok(())
    }

    fn list_history(&self) -> Result<Vec<WorkoutSession>> {
        let mut seen_ids = HashSet::new();
        let mut sessions: Vec<_> = self
            .history
            .iter()
            .filter(|s| seen_ids.insert(s.id))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        Ok(sessions)
    }

    fn remove_history(&mut self, id: Uuid) -> Result<bool> {
        self.check_write()?;
        let before = self.history.len();
        self.history.retain(|s| s.id != id);
        Ok(self.history.len() != before)
    }
}
