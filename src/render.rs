//! Terminal output for the command-line driver.
//!
//! Matches are highlighted with alternating colours through crossterm. With
//! colour off they are bracketed instead, so output stays readable in pipes.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use itertools::Itertools;

use crate::pattern::{MatchOutcome, Pattern};
use crate::span::Span;

/// Colours cycled through for successive matches.
const PALETTE: [Color; 2] = [Color::Cyan, Color::Blue];

/// Write `subject` with every span in `spans` highlighted.
///
/// `spans` must be sorted and non-overlapping.
pub fn write_highlighted(
    out: &mut impl Write,
    subject: &str,
    spans: &[Span],
    color: bool,
) -> io::Result<()> {
    let chars: Vec<char> = subject.chars().collect();
    let mut pos = 0;
    for (i, span) in spans.iter().enumerate() {
        let plain: String = chars[pos.min(span.start)..span.start].iter().collect();
        let matched: String = span.slice(&chars).iter().collect();
        queue!(out, Print(plain))?;
        if color {
            queue!(
                out,
                SetForegroundColor(PALETTE[i % PALETTE.len()]),
                Print(matched),
                ResetColor
            )?;
        } else {
            queue!(out, Print(format!("[{matched}]")))?;
        }
        pos = pos.max(span.end);
    }
    let rest: String = chars[pos.min(chars.len())..].iter().collect();
    queue!(out, Print(rest))?;
    out.flush()
}

/// One line per match: the reported span and text, then each capture group
/// numbered the way `\O` numbers them.
pub fn write_captures(out: &mut impl Write, subject: &str, outcome: &MatchOutcome) -> io::Result<()> {
    let line = outcome
        .captures
        .iter()
        .enumerate()
        .map(|(i, span)| format!("{}:{} {:?}", i + 1, span, span.text(subject)))
        .join("  ");
    writeln!(out, "{} {:?}  {}", outcome.span, outcome.span.text(subject), line)
}

/// The token stream, one token per line.
pub fn write_tokens(out: &mut impl Write, pattern: &Pattern) -> io::Result<()> {
    writeln!(out, "{}", pattern.tokens().iter().join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(subject: &str, spans: &[Span], color: bool) -> String {
        let mut out = Vec::new();
        write_highlighted(&mut out, subject, spans, color).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_highlight() {
        assert_eq!(
            render("xabcxab", &[Span::new(1, 3), Span::new(5, 7)], false),
            "x[ab]cx[ab]"
        );
    }

    #[test]
    fn test_no_spans() {
        assert_eq!(render("hello", &[], false), "hello");
    }

    #[test]
    fn test_coloured_highlight_resets() {
        let out = render("ab", &[Span::new(0, 1)], true);
        assert!(out.starts_with("\x1b["));
        assert!(out.contains('a'));
        assert!(out.ends_with("\x1b[0mb"));
    }

    #[test]
    fn test_empty_span_at_end() {
        assert_eq!(render("ab", &[Span::empty_at(2)], false), "ab[]");
    }

    #[test]
    fn test_captures_line() {
        let pattern = Pattern::new("(a)(.)").unwrap();
        let outcome = pattern.match_at("xab", 0);
        let mut out = Vec::new();
        write_captures(&mut out, "xab", &outcome).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[1, 3) \"ab\"  1:[1, 2) \"a\"  2:[2, 3) \"b\"\n"
        );
    }

    #[test]
    fn test_tokens() {
        let pattern = Pattern::new("a.{2}").unwrap();
        let mut out = Vec::new();
        write_tokens(&mut out, &pattern).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Literal \"a\"\nWildcard\nCounter 2\n"
        );
    }
}
