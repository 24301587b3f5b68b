//! Recursive descent parser from tokens to a [`Node`] tree.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! pattern     = alternation [ '\O' number ]
//! alternation = sequence [ '+' alternation ]
//! sequence    = term { term }
//! term        = value { '\I' | '*' | '{n}' }     (at most one of '*' / '{n}')
//! value       = literal | '.' | '(' alternation ')'
//! ```

use std::fmt;

use super::ast::Node;
use super::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token that cannot start or continue the current construct.
    UnexpectedToken,
    /// The pattern ended where more was required.
    UnexpectedEnd,
    /// `(` without a matching `)`.
    UnclosedGroup,
    /// A second `*` or `{n}` applied to the same value.
    RepeatedQuantifier,
    /// `\O` anywhere but the end of the whole pattern.
    MisplacedSelectionGroup,
    /// `\O` not followed by a non-negative integer.
    InvalidGroupNumber,
    /// `\O<n>` naming a capture group that does not exist.
    UnknownGroup(usize),
    /// Tokens left over after `\O<n>`.
    TrailingTokens,
    /// A token the lexer could not make sense of.
    InvalidToken,
}

/// A parse failure at a token index (`tokens.len()` for unexpected end).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub index: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.index;
        match self.kind {
            ParseErrorKind::UnexpectedToken => write!(f, "Unexpected token at index {at}"),
            ParseErrorKind::UnexpectedEnd => write!(f, "Unexpected end of pattern"),
            ParseErrorKind::UnclosedGroup => write!(f, "Unclosed group '(' in pattern"),
            ParseErrorKind::RepeatedQuantifier => {
                write!(f, "Quantifier applied twice at token index {at}")
            }
            ParseErrorKind::MisplacedSelectionGroup => {
                write!(f, "'\\O' must end the pattern (token index {at})")
            }
            ParseErrorKind::InvalidGroupNumber => {
                write!(f, "'\\O' must be followed by a group number (token index {at})")
            }
            ParseErrorKind::UnknownGroup(n) => {
                write!(f, "'\\O{n}' names a group that does not exist")
            }
            ParseErrorKind::TrailingTokens => {
                write!(f, "Unexpected tokens after '\\O' at index {at}")
            }
            ParseErrorKind::InvalidToken => write!(f, "Invalid token at index {at}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a token stream into a pattern tree.
pub fn parse(tokens: &[Token]) -> Result<Node, ParseError> {
    Parser {
        tokens,
        pos: 0,
        next_group: 0,
    }
    .parse_pattern()
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Index handed to the next `(`.
    next_group: usize,
}

impl Parser<'_> {
    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            index: self.pos,
        }
    }

    /// Error for a token that fits nowhere at the current position.
    fn unexpected(&self) -> ParseError {
        self.error(match self.peek_kind() {
            None => ParseErrorKind::UnexpectedEnd,
            Some(TokenKind::SelectionGroup) => ParseErrorKind::MisplacedSelectionGroup,
            Some(TokenKind::Error(_)) => ParseErrorKind::InvalidToken,
            Some(_) => ParseErrorKind::UnexpectedToken,
        })
    }

    fn parse_pattern(&mut self) -> Result<Node, ParseError> {
        let body = self.parse_alternation()?;
        match self.peek_kind() {
            None => Ok(body),
            Some(TokenKind::SelectionGroup) => self.parse_selection_group(body),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_selection_group(&mut self, body: Node) -> Result<Node, ParseError> {
        self.pos += 1; // consume '\O'
        let token = self
            .tokens
            .get(self.pos)
            .filter(|t| t.kind == TokenKind::Literal)
            .ok_or_else(|| self.error(ParseErrorKind::InvalidGroupNumber))?;
        if !token.text.chars().all(|c| c.is_ascii_digit()) {
            return Err(self.error(ParseErrorKind::InvalidGroupNumber));
        }
        let group = token
            .text
            .parse::<usize>()
            .map_err(|_| self.error(ParseErrorKind::InvalidGroupNumber))?;
        if group > self.next_group {
            return Err(self.error(ParseErrorKind::UnknownGroup(group)));
        }
        self.pos += 1;

        if self.pos < self.tokens.len() {
            return Err(self.error(ParseErrorKind::TrailingTokens));
        }
        Ok(Node::SelectionGroup {
            child: Box::new(body),
            group,
        })
    }

    fn parse_alternation(&mut self) -> Result<Node, ParseError> {
        let left = self.parse_sequence()?;
        if self.peek_kind() == Some(&TokenKind::Either) {
            self.pos += 1; // consume '+'
            let right = self.parse_alternation()?;
            return Ok(Node::Either(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_sequence(&mut self) -> Result<Node, ParseError> {
        let mut items = Vec::new();
        while let Some(kind) = self.peek_kind() {
            if matches!(
                kind,
                TokenKind::RParen | TokenKind::Either | TokenKind::SelectionGroup
            ) {
                break;
            }
            items.push(self.parse_term()?);
        }
        if items.is_empty() {
            return Err(self.unexpected());
        }
        Ok(Node::Sequence(items))
    }

    /// Parse a value and its postfix modifiers, each wrapping the previous result.
    fn parse_term(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_value()?;
        let mut quantified = false;
        loop {
            node = match self.peek_kind() {
                Some(TokenKind::CaseInsensitive) => Node::CaseInsensitive(Box::new(node)),
                Some(TokenKind::Repeated) | Some(TokenKind::Counter(_)) if quantified => {
                    return Err(self.error(ParseErrorKind::RepeatedQuantifier));
                }
                Some(TokenKind::Repeated) => {
                    quantified = true;
                    Node::Repeated(Box::new(node))
                }
                Some(&TokenKind::Counter(count)) => {
                    quantified = true;
                    Node::Counter {
                        child: Box::new(node),
                        count,
                    }
                }
                _ => return Ok(node),
            };
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> Result<Node, ParseError> {
        let node = match self.peek_kind() {
            Some(TokenKind::Literal) => Node::Literal(self.tokens[self.pos].text.clone()),
            Some(TokenKind::Wildcard) => Node::Wildcard,
            Some(TokenKind::LParen) => return self.parse_group(),
            _ => return Err(self.unexpected()),
        };
        self.pos += 1;
        Ok(node)
    }

    fn parse_group(&mut self) -> Result<Node, ParseError> {
        let open = self.pos;
        self.pos += 1; // consume '('
        let index = self.next_group;
        self.next_group += 1;

        let child = self.parse_alternation()?;
        match self.peek_kind() {
            Some(TokenKind::RParen) => {
                self.pos += 1;
                Ok(Node::Grouping {
                    child: Box::new(child),
                    index,
                })
            }
            Some(TokenKind::SelectionGroup) => {
                Err(self.error(ParseErrorKind::MisplacedSelectionGroup))
            }
            _ => Err(ParseError {
                kind: ParseErrorKind::UnclosedGroup,
                index: open,
            }),
        }
    }
}
