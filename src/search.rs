//! Directional, wraparound search and replace
//!
//! The engine is stateless: every operation takes the caller's anchor and
//! flags, runs a primary-window search, optionally retries once in the
//! complementary window (wraparound), and returns a [`SearchOutcome`]. No
//! state survives between invocations.
//!
//! Text storage is not this crate's business. The engine drives any buffer
//! through the [`SearchTarget`] capability trait; [`MemoryBuffer`] is a
//! plain in-memory implementation used by the tests and by hosts that
//! don't bring their own buffer.
//!
//! The two user-visible outcomes are "not found" and "search wrapped";
//! both travel in the outcome for the host to surface. A successful
//! wrapped match is reported distinctly from a plain success.

use regex::Regex;

/// Flags shared by all search operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchFlags {
    pub match_case: bool,
    pub whole_word: bool,
    /// Treat the needle as a regular expression (host capability).
    pub regex: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// One search request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub needle: String,
    pub flags: SearchFlags,
    pub direction: Direction,
    /// Retry once in the complementary window when the primary window has
    /// no match.
    pub wrap: bool,
    /// Offset the search starts from, normally the caret.
    pub anchor: usize,
}

impl SearchQuery {
    pub fn forward(needle: impl Into<String>, anchor: usize) -> Self {
        Self {
            needle: needle.into(),
            flags: SearchFlags::default(),
            direction: Direction::Forward,
            wrap: false,
            anchor,
        }
    }

    pub fn backward(needle: impl Into<String>, anchor: usize) -> Self {
        Self {
            direction: Direction::Backward,
            ..Self::forward(needle, anchor)
        }
    }

    pub fn wrapping(mut self) -> Self {
        self.wrap = true;
        self
    }
}

/// What a search produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    pub found: bool,
    /// Matched `[start, end)` range, when found.
    pub range: Option<(usize, usize)>,
    /// True when the match came from the wraparound retry.
    pub wrapped: bool,
}

impl SearchOutcome {
    fn not_found() -> Self {
        Self::default()
    }

    fn found_at(start: usize, end: usize, wrapped: bool) -> Self {
        Self {
            found: true,
            range: Some((start, end)),
            wrapped,
        }
    }
}

/// The buffer capability the engine drives.
///
/// Offsets are whatever unit the implementation counts in (chars for
/// [`MemoryBuffer`]); the engine never inspects text itself.
pub trait SearchTarget {
    /// Total buffer length.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn caret(&self) -> usize;

    /// Current selection as (anchor, caret).
    fn selection(&self) -> (usize, usize);

    fn set_selection(&mut self, anchor: usize, caret: usize);

    /// Search the window between `start` and `end`.
    ///
    /// `start <= end` scans forward and returns the match nearest `start`;
    /// `start > end` scans backward through `[end, start)` and returns the
    /// match nearest `start`. Matches must lie entirely inside the window.
    fn find_in_range(
        &self,
        start: usize,
        end: usize,
        needle: &str,
        flags: SearchFlags,
    ) -> Option<(usize, usize)>;

    /// Replace `[start, end)` with `replacement`, returning the length of
    /// the inserted text. `Some(pattern)` requests regex group expansion
    /// (`$1`, `$name`) of the replacement against the matched text.
    fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        replacement: &str,
        pattern: Option<&str>,
        flags: SearchFlags,
    ) -> usize;

    /// Open an atomic undo/transaction scope, if the buffer has one.
    fn begin_undo_action(&mut self) {}

    /// Close the scope opened by `begin_undo_action`.
    fn end_undo_action(&mut self) {}
}

/// Directional find with optional wraparound.
///
/// Forward searches `[anchor, len)`, then wraps to `[0, anchor)`. Backward
/// searches make the character immediately before the anchor the first
/// candidate and exclude the character at the anchor itself: the primary
/// window runs from `anchor-1` down to 0 and the wrapped window from the
/// end of the buffer down to `anchor-1`. On success the match becomes the
/// selection.
pub fn find<T: SearchTarget + ?Sized>(target: &mut T, query: &SearchQuery) -> SearchOutcome {
    if query.needle.is_empty() {
        return SearchOutcome::not_found();
    }
    let len = target.len();
    let anchor = query.anchor.min(len);

    let (start, end) = match query.direction {
        Direction::Forward => (anchor, len),
        Direction::Backward => (anchor.saturating_sub(1), 0),
    };
    let mut wrapped = false;
    let mut hit = target.find_in_range(start, end, &query.needle, query.flags);

    if hit.is_none() && query.wrap {
        let (start, end) = match query.direction {
            Direction::Forward => (0, anchor),
            Direction::Backward => (len, anchor.saturating_sub(1)),
        };
        hit = target.find_in_range(start, end, &query.needle, query.flags);
        wrapped = true;
    }

    match hit {
        Some((s, e)) => {
            target.set_selection(s, e);
            SearchOutcome::found_at(s, e, wrapped)
        }
        None => SearchOutcome::not_found(),
    }
}

/// Interactive replace: substitute the current selection, then chain into
/// the next find.
///
/// Substitution only happens when the selection is non-empty (the caller
/// is expected to have a live match selected, usually from a prior
/// [`find`]). Searching forward, the anchor and selection advance past the
/// inserted text before the chained find; the returned outcome describes
/// that find.
pub fn replace<T: SearchTarget + ?Sized>(
    target: &mut T,
    query: &SearchQuery,
    replacement: &str,
) -> SearchOutcome {
    let mut next = query.clone();
    let (sel_anchor, sel_caret) = target.selection();
    if sel_anchor != sel_caret {
        let (lo, hi) = if sel_anchor <= sel_caret {
            (sel_anchor, sel_caret)
        } else {
            (sel_caret, sel_anchor)
        };
        let pattern = query.flags.regex.then_some(query.needle.as_str());
        let inserted = target.replace_range(lo, hi, replacement, pattern, query.flags);
        let after = lo + inserted;
        if query.direction == Direction::Forward {
            target.set_selection(after, after);
        }
        next.anchor = after;
    }
    find(target, &next)
}

/// Replace every match in one pass.
///
/// The anchor is forced to 0 and the whole pass runs inside one undo
/// scope. Each iteration is a forward, non-wrapping find; after a
/// substitution the scan resumes strictly after the end of the inserted
/// replacement, so a replacement can never be matched again within the
/// same pass (replacing `a` with `aa` terminates). Returns the number of
/// substitutions.
pub fn replace_all<T: SearchTarget + ?Sized>(
    target: &mut T,
    needle: &str,
    replacement: &str,
    flags: SearchFlags,
) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let pattern_needle = flags.regex.then_some(needle);
    let mut count = 0;
    let mut pos = 0;

    target.begin_undo_action();
    loop {
        let len = target.len();
        if pos > len {
            break;
        }
        let Some((s, e)) = target.find_in_range(pos, len, needle, flags) else {
            break;
        };
        target.set_selection(s, e);
        let inserted = target.replace_range(s, e, replacement, pattern_needle, flags);
        pos = s + inserted;
        if s == e && inserted == 0 {
            // zero-width match replaced with nothing: step past it
            pos += 1;
        }
        count += 1;
    }
    target.end_undo_action();
    count
}

/// Plain in-memory [`SearchTarget`].
///
/// Offsets are char offsets. Case-insensitive literal matching folds both
/// sides through `to_lowercase`; regex mode goes through the `regex`
/// crate with `(?i)` prepended when case is ignored. An invalid regex
/// needle simply never matches.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    text: String,
    anchor: usize,
    caret: usize,
}

impl MemoryBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: 0,
            caret: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Collapse the selection and place the caret.
    pub fn set_caret(&mut self, pos: usize) {
        let pos = pos.min(self.char_len());
        self.anchor = pos;
        self.caret = pos;
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }

    fn char_at(&self, char_idx: usize) -> Option<char> {
        self.text.chars().nth(char_idx)
    }

    fn is_whole_word(&self, start: usize, end: usize) -> bool {
        let before = start.checked_sub(1).and_then(|idx| self.char_at(idx));
        let after = self.char_at(end);
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    }

    fn literal_find(
        &self,
        lo: usize,
        hi: usize,
        needle: &str,
        flags: SearchFlags,
        backward: bool,
    ) -> Option<(usize, usize)> {
        let window = &self.text[self.byte_at(lo)..self.byte_at(hi)];
        let (hay, folded_needle);
        let (h, n): (&str, &str) = if flags.match_case {
            (window, needle)
        } else {
            hay = window.to_lowercase();
            folded_needle = needle.to_lowercase();
            (&hay, &folded_needle)
        };

        let needle_char_len = needle.chars().count();
        let mut best = None;
        let mut start_byte = 0;
        let mut chars_before = 0;

        while let Some(rel) = h.get(start_byte..).and_then(|tail| tail.find(n)) {
            let match_byte = start_byte + rel;
            chars_before += h[start_byte..match_byte].chars().count();
            let match_start = lo + chars_before;
            let match_end = match_start + needle_char_len;

            if match_end <= hi && (!flags.whole_word || self.is_whole_word(match_start, match_end))
            {
                if !backward {
                    return Some((match_start, match_end));
                }
                best = Some((match_start, match_end));
            }

            // advance one char so overlapping candidates are seen
            let step = h[match_byte..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(1);
            start_byte = match_byte + step;
            chars_before += 1;
        }
        best
    }

    fn regex_find(
        &self,
        lo: usize,
        hi: usize,
        needle: &str,
        flags: SearchFlags,
        backward: bool,
    ) -> Option<(usize, usize)> {
        let re = compile_search_regex(needle, flags)?;
        let window_start = self.byte_at(lo);
        let window = &self.text[window_start..self.byte_at(hi)];

        let mut best = None;
        for m in re.find_iter(window) {
            let match_start = lo + window[..m.start()].chars().count();
            let match_end = match_start + window[m.start()..m.end()].chars().count();
            if flags.whole_word && !self.is_whole_word(match_start, match_end) {
                continue;
            }
            if !backward {
                return Some((match_start, match_end));
            }
            best = Some((match_start, match_end));
        }
        best
    }
}

impl SearchTarget for MemoryBuffer {
    fn len(&self) -> usize {
        self.char_len()
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn selection(&self) -> (usize, usize) {
        (self.anchor, self.caret)
    }

    fn set_selection(&mut self, anchor: usize, caret: usize) {
        let len = self.char_len();
        self.anchor = anchor.min(len);
        self.caret = caret.min(len);
    }

    fn find_in_range(
        &self,
        start: usize,
        end: usize,
        needle: &str,
        flags: SearchFlags,
    ) -> Option<(usize, usize)> {
        if needle.is_empty() {
            return None;
        }
        let len = self.char_len();
        let (backward, lo, hi) = if start <= end {
            (false, start.min(len), end.min(len))
        } else {
            (true, end.min(len), start.min(len))
        };
        if flags.regex {
            self.regex_find(lo, hi, needle, flags, backward)
        } else {
            self.literal_find(lo, hi, needle, flags, backward)
        }
    }

    fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        replacement: &str,
        pattern: Option<&str>,
        flags: SearchFlags,
    ) -> usize {
        let len = self.char_len();
        let start = start.min(len);
        let end = end.min(len).max(start);
        let byte_start = self.byte_at(start);
        let byte_end = self.byte_at(end);

        let inserted = match pattern {
            Some(p) => expand_replacement(&self.text[byte_start..byte_end], p, replacement, flags),
            None => replacement.to_string(),
        };
        self.text.replace_range(byte_start..byte_end, &inserted);

        let inserted_len = inserted.chars().count();
        let removed = end - start;
        self.caret = adjust_position(self.caret, start, removed, inserted_len);
        self.anchor = adjust_position(self.anchor, start, removed, inserted_len);
        inserted_len
    }
}

/// Expand `$N`/`$name` groups in `replacement` against the text the
/// pattern matched. Falls back to the literal replacement when the
/// pattern no longer matches (or never compiled).
fn expand_replacement(matched: &str, pattern: &str, replacement: &str, flags: SearchFlags) -> String {
    let Some(re) = compile_search_regex(pattern, flags) else {
        return replacement.to_string();
    };
    match re.captures(matched) {
        Some(caps) => {
            let mut dst = String::new();
            caps.expand(replacement, &mut dst);
            dst
        }
        None => replacement.to_string(),
    }
}

fn compile_search_regex(needle: &str, flags: SearchFlags) -> Option<Regex> {
    let pattern = if flags.match_case {
        needle.to_string()
    } else {
        format!("(?i){}", needle)
    };
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::debug!("invalid search pattern {:?}: {}", needle, e);
            None
        }
    }
}

/// Where a buffer position lands after replacing `removed` units at
/// `start` with `inserted` units. Positions inside the removed range
/// collapse to its start.
fn adjust_position(pos: usize, start: usize, removed: usize, inserted: usize) -> usize {
    if pos <= start {
        pos
    } else if pos >= start + removed {
        pos - removed + inserted
    } else {
        start
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_range_forward_first_match() {
        let buf = MemoryBuffer::new("abc abc abc");
        let hit = buf.find_in_range(1, 11, "abc", SearchFlags::default());
        assert_eq!(hit, Some((4, 7)));
    }

    #[test]
    fn test_find_in_range_backward_nearest_to_start() {
        let buf = MemoryBuffer::new("abc abc abc");
        // backward over [0, 10): last match fully inside
        let hit = buf.find_in_range(10, 0, "abc", SearchFlags::default());
        assert_eq!(hit, Some((4, 7)));
    }

    #[test]
    fn test_find_case_folding() {
        let buf = MemoryBuffer::new("Hello HELLO hello");
        let flags = SearchFlags::default();
        assert_eq!(buf.find_in_range(0, 17, "hello", flags), Some((0, 5)));

        let case = SearchFlags {
            match_case: true,
            ..Default::default()
        };
        assert_eq!(buf.find_in_range(0, 17, "hello", case), Some((12, 17)));
    }

    #[test]
    fn test_find_whole_word() {
        let buf = MemoryBuffer::new("cat category cat");
        let flags = SearchFlags {
            whole_word: true,
            ..Default::default()
        };
        assert_eq!(buf.find_in_range(1, 16, "cat", flags), Some((13, 16)));
    }

    #[test]
    fn test_find_regex() {
        let buf = MemoryBuffer::new("x1 y22 z333");
        let flags = SearchFlags {
            regex: true,
            ..Default::default()
        };
        assert_eq!(buf.find_in_range(0, 11, r"\d{2,}", flags), Some((4, 6)));
    }

    #[test]
    fn test_invalid_regex_never_matches() {
        let buf = MemoryBuffer::new("abc");
        let flags = SearchFlags {
            regex: true,
            ..Default::default()
        };
        assert_eq!(buf.find_in_range(0, 3, "(", flags), None);
    }

    #[test]
    fn test_replace_range_adjusts_caret() {
        let mut buf = MemoryBuffer::new("hello world");
        buf.set_selection(0, 5);
        let inserted = buf.replace_range(0, 5, "hi", None, SearchFlags::default());
        assert_eq!(inserted, 2);
        assert_eq!(buf.text(), "hi world");
        assert_eq!(buf.selection(), (0, 2));
    }

    #[test]
    fn test_replace_range_regex_groups() {
        let mut buf = MemoryBuffer::new("2026-08-07");
        let flags = SearchFlags {
            regex: true,
            ..Default::default()
        };
        let inserted = buf.replace_range(
            0,
            10,
            "$3/$2/$1",
            Some(r"(\d{4})-(\d{2})-(\d{2})"),
            flags,
        );
        assert_eq!(inserted, 10);
        assert_eq!(buf.text(), "07/08/2026");
    }

    #[test]
    fn test_adjust_position_cases() {
        // before the edit
        assert_eq!(adjust_position(2, 5, 3, 1), 2);
        // after the edit
        assert_eq!(adjust_position(10, 5, 3, 1), 8);
        // inside the removed range
        assert_eq!(adjust_position(6, 5, 3, 1), 5);
    }

    #[test]
    fn test_unicode_offsets() {
        let buf = MemoryBuffer::new("αβγ αβγ");
        assert_eq!(
            buf.find_in_range(0, 7, "βγ", SearchFlags::default()),
            Some((1, 3))
        );
    }
}
