//! Tree-walking backtracking matcher.
//!
//! All positions are **character** (not byte) indices into the subject.
//!
//! Nodes are evaluated in one of two modes. *Anchored* evaluation ([`eval`])
//! must match at the cursor. *Searching* evaluation ([`find`]) looks for the
//! leftmost match at or after the cursor; the top of the tree always searches.

use crate::span::Span;

use super::ast::Node;
use super::state::MatchState;

/// The result of one match attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub success: bool,
    /// Reported span: the whole match, or the group chosen by `\O<n>`.
    pub span: Span,
    /// Whole consumed span; scanning for the next match resumes from its end.
    pub full: Span,
    /// One span per capture group, empty at subject end when not captured.
    pub captures: Vec<Span>,
    /// Index of the capture group closed most recently.
    pub last_group: Option<usize>,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        self.success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Anchored,
    Search,
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Find the leftmost match of `root` in `text` at or after `start`.
///
/// `groups` must equal the number of `Grouping` nodes in `root`.
pub fn match_at(root: &Node, text: &[char], groups: usize, start: usize) -> MatchOutcome {
    let mut st = MatchState::new(text, groups, start);
    let success = find(root, &mut st);
    let full = st.window;
    MatchOutcome {
        success,
        span: st.selected.unwrap_or(full),
        full,
        captures: st.captures,
        last_group: st.last_group,
    }
}

/// Searching evaluation: leftmost match at or after the cursor.
///
/// On success the window covers the match. On failure the window is collapsed
/// to subject end and captures are back to their state on entry.
pub(crate) fn find(node: &Node, st: &mut MatchState<'_>) -> bool {
    match node {
        Node::Either(left, right) => either(left, right, st, Mode::Search),
        Node::SelectionGroup { child, group } => {
            if !find(child, st) {
                st.collapse();
                return false;
            }
            st.selected = Some(selection(st, *group));
            true
        }
        _ => scan(node, st),
    }
}

/// Anchored evaluation: match `node` starting exactly at the cursor.
///
/// On success the cursor has advanced past the consumed text. On failure the
/// cursor is back where it started; captures may hold leftovers that the
/// enclosing scan or alternation discards.
pub(crate) fn eval(node: &Node, st: &mut MatchState<'_>) -> bool {
    match node {
        Node::Literal(text) => literal(text, st),
        Node::Wildcard => {
            if st.remaining() == 0 {
                return false;
            }
            st.set_cursor(st.cursor() + 1);
            st.from_wildcard = true;
            true
        }
        Node::Sequence(children) => sequence(children, st),
        Node::Repeated(child) => repeated(child, st),
        Node::Counter { child, count } => counter(child, *count, st),
        Node::CaseInsensitive(child) => {
            st.fold_depth += 1;
            let matched = eval(child, st);
            st.fold_depth -= 1;
            matched
        }
        Node::Either(left, right) => either(left, right, st, Mode::Anchored),
        Node::Grouping { child, index } => grouping(child, *index, st),
        Node::SelectionGroup { child, group } => {
            if !eval(child, st) {
                return false;
            }
            st.selected = Some(selection(st, *group));
            true
        }
    }
}

// ─── Searching ───────────────────────────────────────────────────────────────

/// Try an anchored match at each start from the cursor to subject end.
///
/// Every retry starts one character further on, so an attempt that makes no
/// progress is never repeated.
fn scan(node: &Node, st: &mut MatchState<'_>) -> bool {
    let origin = st.clone();
    for start in origin.cursor()..=origin.end() {
        st.restart_at(start);
        if eval(node, st) {
            return true;
        }
        st.clone_from(&origin);
    }
    st.collapse();
    false
}

fn selection(st: &MatchState<'_>, group: usize) -> Span {
    match group {
        0 => st.window,
        n => st.captures[n - 1],
    }
}

// ─── Node evaluation ─────────────────────────────────────────────────────────

fn literal(text: &str, st: &mut MatchState<'_>) -> bool {
    let mut pos = st.cursor();
    for pat in text.chars() {
        match st.char_at(pos) {
            Some(ch) if st.chars_match(pat, ch) => pos += 1,
            _ => return false,
        }
    }
    st.set_cursor(pos);
    st.from_wildcard = false;
    true
}

/// Match `children` in order from the cursor.
///
/// When a child leaves `was_greedy` raised and more children follow, the rest
/// of the sequence is retried from the greedy high-water mark backwards until
/// it matches. A greedy last child leaves the flag raised for the enclosing
/// sequence to handle.
fn sequence(children: &[Node], st: &mut MatchState<'_>) -> bool {
    let Some((first, rest)) = children.split_first() else {
        return true;
    };
    let begin = st.cursor();
    st.was_greedy = false;
    st.greedy_groups.clear();

    let matched = eval(first, st)
        && if st.was_greedy && !rest.is_empty() {
            give_back(rest, st)
        } else {
            sequence(rest, st)
        };
    if !matched {
        st.set_cursor(begin);
    }
    matched
}

/// Shrink a greedy run one character at a time until `rest` matches.
///
/// Positions where `rest` is already known to fail are skipped.
fn give_back(rest: &[Node], st: &mut MatchState<'_>) -> bool {
    let floor = st.greedy_floor;
    let high = st.cursor();
    let groups = std::mem::take(&mut st.greedy_groups);
    st.was_greedy = false;

    for pos in (floor..=high).rev() {
        st.set_cursor(pos);
        if st.failed_before(rest) {
            continue;
        }
        let saved = st.clone();
        for &g in &groups {
            let capture = &mut st.captures[g];
            capture.end = pos.max(capture.start);
        }
        if sequence(rest, st) {
            return true;
        }
        *st = saved;
        st.record_failure(rest);
    }
    st.set_cursor(high);
    false
}

/// One or more repetitions of `child`.
///
/// A wildcard child runs straight to subject end and raises `was_greedy`; the
/// enclosing sequence gives characters back. Otherwise the match extends over
/// the run of the last character the child consumed, so `lo*` takes "loo".
fn repeated(child: &Node, st: &mut MatchState<'_>) -> bool {
    let begin = st.cursor();
    st.from_wildcard = false;
    if !eval(child, st) {
        return false;
    }
    if st.was_greedy {
        return true;
    }
    if st.from_wildcard {
        st.greedy_floor = st.cursor();
        st.set_cursor(st.end());
        st.was_greedy = true;
        return true;
    }
    if st.cursor() == begin {
        return true;
    }
    let Some(last) = st.char_at(st.cursor() - 1) else {
        return true;
    };
    let mut pos = st.cursor();
    while let Some(ch) = st.char_at(pos)
        && st.chars_match(last, ch)
    {
        pos += 1;
    }
    st.set_cursor(pos);
    true
}

fn counter(child: &Node, count: usize, st: &mut MatchState<'_>) -> bool {
    if st.remaining() < count {
        return false;
    }
    let begin = st.cursor();
    for _ in 0..count {
        if !eval(child, st) {
            st.set_cursor(begin);
            return false;
        }
    }
    true
}

fn grouping(child: &Node, index: usize, st: &mut MatchState<'_>) -> bool {
    let begin = st.cursor();
    if !eval(child, st) {
        st.captures[index] = Span::empty_at(st.end());
        return false;
    }
    st.captures[index] = Span::new(begin, st.cursor());
    st.last_group = Some(index);
    if st.was_greedy {
        st.greedy_groups.push(index);
    }
    true
}

/// Evaluate both sides from the same state and keep the better result.
///
/// Both matched: the earlier window start wins, ties go left. A failed side
/// leaves its cursor rewound (anchored) or collapsed (searching), so when
/// neither matches the right side's state is kept as is.
fn either(left: &Node, right: &Node, st: &mut MatchState<'_>, mode: Mode) -> bool {
    let origin = st.clone();
    let left_matched = run(left, st, mode);
    let after_left = std::mem::replace(st, origin);
    let right_matched = run(right, st, mode);

    let keep_left = match (left_matched, right_matched) {
        (true, false) => true,
        (true, true) => after_left.window.start <= st.window.start,
        (false, _) => false,
    };
    if keep_left {
        *st = after_left;
    }
    left_matched || right_matched
}

fn run(node: &Node, st: &mut MatchState<'_>, mode: Mode) -> bool {
    match mode {
        Mode::Anchored => eval(node, st),
        Mode::Search => find(node, st),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
