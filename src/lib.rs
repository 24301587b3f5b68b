//! A miniature pattern-matching language.
//!
//! Patterns are lexed, parsed into a [`Node`] tree and evaluated by a
//! backtracking tree-walking matcher over a subject string.
//!
//! # Example
//!
//! ```rust
//! use waterloo::{Pattern, Span};
//!
//! let pattern = Pattern::new(".*Waterloo").unwrap();
//! let outcome = pattern.match_at("xxWaterloo", 0);
//! assert!(outcome.success);
//! assert_eq!(outcome.span, Span::new(0, 10));
//!
//! // `\O1` reports the first capture group instead of the whole match.
//! let pattern = Pattern::new("(w.r) Waterloo\\O1").unwrap();
//! let outcome = pattern.match_at("the war Waterloo", 0);
//! assert_eq!(outcome.span.text("the war Waterloo"), "war");
//! ```

pub mod pattern;
pub mod render;
mod span;

pub use pattern::{
    LexError, MatchOutcome, Matches, Node, ParseError, Pattern, PatternError, Token, TokenKind,
};
pub use span::Span;
