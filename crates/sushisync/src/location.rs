//! The persisted location: a query string with history.
//!
//! Writes made through [`Location::write`] are not echoed to subscribers.
//! Only external changes (back, forward, navigation) are broadcast, so the
//! filter synchronizer never reacts to its own writes.

use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// How a write lands in the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Append a new history entry.
    #[default]
    Push,
    /// Overwrite the current history entry.
    Replace,
}

impl WriteMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "push" => Some(WriteMode::Push),
            "replace" => Some(WriteMode::Replace),
            _ => None,
        }
    }
}

/// A persisted query string.
pub trait Location: Send + Sync {
    /// Returns the current query string.
    fn read(&self) -> String;

    /// Replaces the query string.
    fn write(&self, query: &str, mode: WriteMode);

    /// Receives the new query string after every external change.
    fn subscribe(&self) -> broadcast::Receiver<String>;
}

#[derive(Debug)]
struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    fn current(&self) -> String {
        self.entries.get(self.index).cloned().unwrap_or_default()
    }
}

/// An in-process location with browser-like history.
#[derive(Debug)]
pub struct MemoryLocation {
    history: Mutex<History>,
    changes: broadcast::Sender<String>,
}

impl MemoryLocation {
    pub fn new(initial: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            history: Mutex::new(History {
                entries: vec![initial.into()],
                index: 0,
            }),
            changes,
        }
    }

    /// Moves one entry back. Returns false at the start of history.
    pub fn back(&self) -> bool {
        self.step(|index, _| index.checked_sub(1))
    }

    /// Moves one entry forward. Returns false at the end of history.
    pub fn forward(&self) -> bool {
        self.step(|index, len| Some(index + 1).filter(|next| *next < len))
    }

    /// Pushes an entry as if the user navigated to it.
    pub fn navigate(&self, query: impl Into<String>) {
        let query = query.into();
        self.push(query.clone());
        let _ = self.changes.send(query);
    }

    /// Returns every history entry, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().entries.clone()
    }

    fn step(&self, next: impl FnOnce(usize, usize) -> Option<usize>) -> bool {
        let current = {
            let mut history = self.lock();
            let Some(index) = next(history.index, history.entries.len()) else {
                return false;
            };
            history.index = index;
            history.current()
        };
        let _ = self.changes.send(current);
        true
    }

    fn push(&self, query: String) {
        let mut history = self.lock();
        let keep = history.index + 1;
        history.entries.truncate(keep);
        history.entries.push(query);
        history.index = keep;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("")
    }
}

impl Location for MemoryLocation {
    fn read(&self) -> String {
        self.lock().current()
    }

    fn write(&self, query: &str, mode: WriteMode) {
        match mode {
            WriteMode::Push => self.push(query.to_string()),
            WriteMode::Replace => {
                let mut history = self.lock();
                let index = history.index;
                history.entries[index] = query.to_string();
            }
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}
