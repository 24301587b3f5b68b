//! Pattern language: lexer, parser and backtracking matcher.
//!
//! # Pattern syntax
//!
//! | Token         | Meaning                                               |
//! |---------------|-------------------------------------------------------|
//! | `text`        | Literal run, matched verbatim                         |
//! | `.`           | Any one character                                     |
//! | `(…)`         | Capture group, numbered from 0 by opening parenthesis |
//! | `X*`          | One or more, greedy (see below)                       |
//! | `X{n}`        | Exactly n                                             |
//! | `X\I`         | X matched ignoring ASCII case                         |
//! | `A+B`         | Alternation                                           |
//! | `…\On`        | Report group n (0 = whole match); must end the pattern |
//!
//! A literal run extends up to the next special character. `*` after a
//! wildcard runs to the end of the subject and gives characters back as the
//! rest of the pattern needs them. After anything else it extends over the
//! run of the last character matched, so `lo*` matches "loo".

pub mod ast;
pub mod lexer;
pub mod matcher;
pub mod parser;
mod state;

use std::fmt;
use std::str::FromStr;

pub use ast::Node;
pub use lexer::{LexError, LexErrorKind, Token, TokenKind, lex, tokenize};
pub use matcher::MatchOutcome;
pub use parser::{ParseError, ParseErrorKind, parse};

/// Errors that can occur while compiling a pattern string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    Lex(LexError),
    Parse(ParseError),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => write!(f, "Bad pattern: {err}"),
            Self::Parse(err) => write!(f, "Bad pattern: {err}"),
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<LexError> for PatternError {
    fn from(err: LexError) -> Self {
        Self::Lex(err)
    }
}

impl From<ParseError> for PatternError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

/// A compiled pattern. Immutable, so it can be shared between threads and
/// matched against any number of subjects.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
    root: Node,
    groups: usize,
}

impl Pattern {
    /// Lex and parse `source`.
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let tokens = lex(source)?;
        let root = parse(&tokens)?;
        let groups = root.group_count();
        Ok(Self {
            source: source.to_string(),
            tokens,
            root,
            groups,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of capture groups.
    pub fn group_count(&self) -> usize {
        self.groups
    }

    /// Find the leftmost match at or after character position `start`.
    pub fn match_at(&self, subject: &str, start: usize) -> MatchOutcome {
        let chars: Vec<char> = subject.chars().collect();
        self.match_chars(&chars, start)
    }

    /// As [`Pattern::match_at`], for a subject already split into characters.
    pub fn match_chars(&self, subject: &[char], start: usize) -> MatchOutcome {
        matcher::match_at(&self.root, subject, self.groups, start)
    }

    pub fn is_match(&self, subject: &str) -> bool {
        self.match_at(subject, 0).success
    }

    /// Iterate over successive non-overlapping matches in `subject`.
    pub fn find_iter(&self, subject: &str) -> Matches<'_> {
        self.find_iter_from(subject, 0)
    }

    /// As [`Pattern::find_iter`], starting the scan at character position `start`.
    pub fn find_iter_from(&self, subject: &str, start: usize) -> Matches<'_> {
        Matches {
            pattern: self,
            chars: subject.chars().collect(),
            pos: start,
        }
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Iterator over the matches of a [`Pattern`], built on repeated
/// [`Pattern::match_chars`] calls.
///
/// Each scan resumes at the end of the previous whole match (one character
/// further for an empty match) and stops at the first failure or once the
/// resume position reaches the end of the subject.
pub struct Matches<'p> {
    pattern: &'p Pattern,
    chars: Vec<char>,
    pos: usize,
}

impl Iterator for Matches<'_> {
    type Item = MatchOutcome;

    fn next(&mut self) -> Option<MatchOutcome> {
        if self.pos >= self.chars.len() {
            return None;
        }
        let outcome = self.pattern.match_chars(&self.chars, self.pos);
        if !outcome.success {
            self.pos = self.chars.len();
            return None;
        }
        self.pos = if outcome.full.is_empty() {
            outcome.full.end + 1
        } else {
            outcome.full.end
        };
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    fn spans(pattern: &str, subject: &str) -> Vec<(usize, usize)> {
        Pattern::new(pattern)
            .unwrap()
            .find_iter(subject)
            .map(|m| (m.span.start, m.span.end))
            .collect()
    }

    #[test]
    fn test_new_reports_lex_errors() {
        let err = Pattern::new("a{").unwrap_err();
        assert!(matches!(
            err,
            PatternError::Lex(LexError {
                kind: LexErrorKind::UnterminatedCounter,
                offset: 1,
            })
        ));
    }

    #[test]
    fn test_new_reports_parse_errors() {
        let err = Pattern::new("(ab").unwrap_err();
        assert!(matches!(
            err,
            PatternError::Parse(ParseError {
                kind: ParseErrorKind::UnclosedGroup,
                index: 0,
            })
        ));
        assert!(Pattern::new("").is_err());
    }

    #[test]
    fn test_error_display_and_source() {
        use std::error::Error;
        let err = Pattern::new("a\\z").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad pattern: Unrecognised escape '\\z' at offset 1"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_str() {
        let pattern: Pattern = "(a)b".parse().unwrap();
        assert_eq!(pattern.group_count(), 1);
        assert_eq!(pattern.source(), "(a)b");
        assert_eq!(pattern.tokens().len(), 4);
    }

    #[test]
    fn test_find_iter_case_insensitive() {
        assert_eq!(spans("a\\I", "AaA"), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_find_iter_waterloo() {
        let subject = "Waterloo I was defeated, you won the war Waterloo promise";
        assert_eq!(spans("Waterloo", subject), vec![(0, 8), (41, 49)]);
    }

    #[test]
    fn test_find_iter_resumes_after_full_match() {
        // The reported span is the group, but scanning resumes after "ab".
        assert_eq!(spans("(a)b\\O1", "abab"), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_find_iter_empty_matches_advance() {
        let pattern = Pattern::new("a{0}").unwrap();
        let found: Vec<Span> = pattern.find_iter("xyz").map(|m| m.span).collect();
        assert_eq!(
            found,
            vec![Span::empty_at(0), Span::empty_at(1), Span::empty_at(2)]
        );
    }

    #[test]
    fn test_find_iter_from() {
        let pattern = Pattern::new("ab").unwrap();
        let found: Vec<Span> = pattern.find_iter_from("ababab", 1).map(|m| m.span).collect();
        assert_eq!(found, vec![Span::new(2, 4), Span::new(4, 6)]);
    }

    #[test]
    fn test_is_match() {
        let pattern = Pattern::new("w.r").unwrap();
        assert!(pattern.is_match("the war"));
        assert!(!pattern.is_match("the wr"));
    }

    #[test]
    fn test_pattern_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pattern>();
    }
}
