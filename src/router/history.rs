//! Session history abstraction.
//!
//! The navigator never touches a browser; it talks to a [`History`]. The
//! in-memory implementation backs server rendering and tests.

use super::location::Location;

/// A stack of visited locations with a cursor, like `window.history`.
pub trait History {
    /// Entry under the cursor.
    fn current(&self) -> &Location;

    /// Push a new entry, dropping any forward entries.
    fn push(&mut self, location: Location);

    /// Replace the entry under the cursor.
    fn replace(&mut self, location: Location);

    /// Move the cursor back. Returns `false` at the first entry.
    fn back(&mut self) -> bool;

    /// Move the cursor forward. Returns `false` at the last entry.
    fn forward(&mut self) -> bool;

    fn len(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    /// History with a single entry at `path`.
    pub fn at(path: &str) -> Self {
        Self::new(Location::parse(path))
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::at("/")
    }
}

impl History for MemoryHistory {
    fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    fn push(&mut self, location: Location) {
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    fn replace(&mut self, location: Location) {
        self.entries[self.index] = location;
    }

    fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
