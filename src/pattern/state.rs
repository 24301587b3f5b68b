//! Mutable scan state shared by every node during one match attempt.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::span::Span;

use super::ast::Node;

/// A sequence suffix (by address and length), a cursor and a fold depth.
type Attempt = (usize, usize, usize, usize);

/// Cursor, captures and flags for a single match attempt.
///
/// A fresh state is built for every top-level attempt; the pattern tree itself
/// is never mutated. Snapshots are plain clones (the subject is borrowed).
/// Clones share the record of failed attempts, so restoring a snapshot never
/// forgets one.
#[derive(Debug, Clone)]
pub(crate) struct MatchState<'t> {
    text: &'t [char],
    /// Candidate match start and cursor. `window.end` is the cursor.
    pub(crate) window: Span,
    /// One slot per `Grouping` node, empty at subject end until closed.
    pub(crate) captures: Vec<Span>,
    /// Case folding is on while this is non-zero.
    pub(crate) fold_depth: usize,
    /// Set by `Wildcard`, cleared by `Literal`; read by `Repeated` to decide
    /// between maximal munch and repeated re-evaluation.
    pub(crate) from_wildcard: bool,
    /// Raised by `Repeated` after running to subject end. Read and cleared only
    /// by the enclosing anchored sequence, which gives characters back down to
    /// `greedy_floor`.
    pub(crate) was_greedy: bool,
    pub(crate) greedy_floor: usize,
    /// Groups closed while `was_greedy` was pending; shrunk along with the give-back.
    pub(crate) greedy_groups: Vec<usize>,
    /// Index of the capture group closed most recently.
    pub(crate) last_group: Option<usize>,
    /// Span chosen by a trailing `\O<n>`.
    pub(crate) selected: Option<Span>,
    /// Sequence suffixes known not to match at a cursor. Whether a suffix
    /// matches depends only on the cursor and fold depth, so an entry stays
    /// valid for the whole attempt.
    failed: Rc<RefCell<HashSet<Attempt>>>,
}

impl<'t> MatchState<'t> {
    /// Create a state over `text` with `groups` capture slots and the cursor at `start`.
    ///
    /// A start past the end of the subject is clamped to the end.
    pub(crate) fn new(text: &'t [char], groups: usize, start: usize) -> Self {
        let end = text.len();
        Self {
            text,
            window: Span::empty_at(start.min(end)),
            captures: vec![Span::empty_at(end); groups],
            fold_depth: 0,
            from_wildcard: false,
            was_greedy: false,
            greedy_floor: 0,
            greedy_groups: Vec::new(),
            last_group: None,
            selected: None,
            failed: Rc::default(),
        }
    }

    pub(crate) fn end(&self) -> usize {
        self.text.len()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.window.end
    }

    pub(crate) fn set_cursor(&mut self, pos: usize) {
        debug_assert!(self.window.start <= pos && pos <= self.end());
        self.window.end = pos;
    }

    /// Characters left between the cursor and subject end.
    pub(crate) fn remaining(&self) -> usize {
        self.end() - self.cursor()
    }

    pub(crate) fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos).copied()
    }

    /// Compare a pattern character with a subject character under the current fold depth.
    pub(crate) fn chars_match(&self, pat: char, ch: char) -> bool {
        if self.fold_depth > 0 {
            pat.eq_ignore_ascii_case(&ch)
        } else {
            pat == ch
        }
    }

    /// Start a fresh attempt at `start`: empty window, flags down.
    pub(crate) fn restart_at(&mut self, start: usize) {
        self.window = Span::empty_at(start);
        self.from_wildcard = false;
        self.was_greedy = false;
        self.greedy_groups.clear();
    }

    fn attempt(&self, rest: &[Node]) -> Attempt {
        (rest.as_ptr() as usize, rest.len(), self.cursor(), self.fold_depth)
    }

    /// Whether `rest` already failed to match at the cursor.
    pub(crate) fn failed_before(&self, rest: &[Node]) -> bool {
        self.failed.borrow().contains(&self.attempt(rest))
    }

    pub(crate) fn record_failure(&self, rest: &[Node]) {
        let attempt = self.attempt(rest);
        self.failed.borrow_mut().insert(attempt);
    }

    /// Collapse the window to an empty span at subject end (terminal failure).
    pub(crate) fn collapse(&mut self) {
        self.window = Span::empty_at(self.end());
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_new_state() {
        let text = chars("abc");
        let st = MatchState::new(&text, 2, 1);
        assert_eq!(st.window, Span::empty_at(1));
        assert_eq!(st.captures, vec![Span::empty_at(3), Span::empty_at(3)]);
        assert_eq!(st.end(), 3);
        assert_eq!(st.remaining(), 2);
    }

    #[test]
    fn test_start_clamped_to_end() {
        let text = chars("ab");
        let st = MatchState::new(&text, 0, 10);
        assert_eq!(st.cursor(), 2);
        assert_eq!(st.remaining(), 0);
    }

    #[test]
    fn test_fold_depth_controls_comparison() {
        let text = chars("");
        let mut st = MatchState::new(&text, 0, 0);
        assert!(!st.chars_match('a', 'A'));
        st.fold_depth += 1;
        assert!(st.chars_match('a', 'A'));
        assert!(!st.chars_match('å', 'Å'));
    }

    #[test]
    fn test_collapse() {
        let text = chars("abcd");
        let mut st = MatchState::new(&text, 0, 0);
        st.restart_at(1);
        st.set_cursor(3);
        st.collapse();
        assert_eq!(st.window, Span::empty_at(4));
    }

    #[test]
    fn test_failures_survive_snapshot_restore() {
        let text = chars("abc");
        let rest = [Node::Literal("x".into())];
        let mut st = MatchState::new(&text, 0, 0);
        let saved = st.clone();
        st.set_cursor(2);
        st.record_failure(&rest);
        st = saved;
        assert!(!st.failed_before(&rest));
        st.set_cursor(2);
        assert!(st.failed_before(&rest));
        st.fold_depth += 1;
        assert!(!st.failed_before(&rest));
    }
}
