//! Bookmark markers and wraparound navigation
//!
//! A sparse ordered set of marked line numbers, navigated with the same
//! primary-window-then-wrap-once shape the search engine uses: look for
//! the nearest marked line after/before the current one, wrap once to the
//! opposite end of the document, and give up if the set stays empty.

use std::collections::BTreeSet;

/// Sparse set of bookmarked lines.
#[derive(Debug, Clone, Default)]
pub struct BookmarkSet {
    lines: BTreeSet<usize>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the bookmark on a line. Returns true when the line is marked
    /// afterwards.
    pub fn toggle(&mut self, line: usize) -> bool {
        if self.lines.remove(&line) {
            false
        } else {
            self.lines.insert(line);
            true
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    pub fn clear_all(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Marked lines in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().copied()
    }

    /// Nearest marked line after `current`, wrapping once to the top of
    /// the document. `None` when nothing is marked within `last_line`.
    pub fn next(&self, current: usize, last_line: usize) -> Option<usize> {
        let from = current.saturating_add(1);
        let ahead = if from <= last_line {
            self.lines.range(from..=last_line).next()
        } else {
            None
        };
        ahead.or_else(|| self.lines.range(..=last_line).next()).copied()
    }

    /// Nearest marked line before `current`, wrapping once to the bottom
    /// of the document. `None` when nothing is marked within `last_line`.
    pub fn previous(&self, current: usize, last_line: usize) -> Option<usize> {
        self.lines
            .range(..current)
            .next_back()
            .or_else(|| self.lines.range(..=last_line).next_back())
            .copied()
    }
}
