//! Tokenizer for pattern strings.
//!
//! Lexing is total: malformed input yields [`TokenKind::Error`] tokens rather
//! than stopping the scan. [`lex`] is the strict entry point that turns the
//! first error token into a [`LexError`].

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use phf::{Map, phf_map};

/// Why a character sequence could not be tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// `{` not followed by one or more digits and a closing `}`.
    UnterminatedCounter,
    /// `\` followed by something other than `I` or `O` (`None` at end of input).
    UnrecognisedEscape(Option<char>),
}

/// A lexing failure at a character offset in the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LexErrorKind::UnterminatedCounter => {
                write!(f, "Unterminated counter '{{' at offset {}", self.offset)
            }
            LexErrorKind::UnrecognisedEscape(Some(c)) => {
                write!(f, "Unrecognised escape '\\{c}' at offset {}", self.offset)
            }
            LexErrorKind::UnrecognisedEscape(None) => {
                write!(f, "Dangling '\\' at offset {}", self.offset)
            }
        }
    }
}

impl std::error::Error for LexError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of plain characters.
    Literal,
    LParen,
    RParen,
    /// `{n}`
    Counter(usize),
    /// `\I`
    CaseInsensitive,
    /// `+`
    Either,
    /// `*`
    Repeated,
    /// `\O`; the group number follows as a separate literal token.
    SelectionGroup,
    /// `.`
    Wildcard,
    Error(LexErrorKind),
}

/// One lexed token. `offset` is the character position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Literal => write!(f, "Literal {:?}", self.text),
            TokenKind::Counter(n) => write!(f, "Counter {n}"),
            TokenKind::Error(_) => write!(f, "Error {:?}", self.text),
            kind => write!(f, "{kind:?}"),
        }
    }
}

/// Single-character tokens.
const SYMBOLS: Map<char, TokenKind> = phf_map! {
    '(' => TokenKind::LParen,
    ')' => TokenKind::RParen,
    '+' => TokenKind::Either,
    '*' => TokenKind::Repeated,
    '.' => TokenKind::Wildcard,
};

/// Characters accepted after `\`.
const ESCAPES: Map<char, TokenKind> = phf_map! {
    'I' => TokenKind::CaseInsensitive,
    'O' => TokenKind::SelectionGroup,
};

/// True for characters that end a literal run.
fn is_special(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '\\' | '+' | '*' | '.')
}

/// Tokenize `pattern`, keeping malformed constructs as error tokens.
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let mut lexer = Lexer {
        chars: pattern.chars().peekable(),
        pos: 0,
    };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    tokens
}

/// Tokenize `pattern`, failing on the first malformed construct.
pub fn lex(pattern: &str) -> Result<Vec<Token>, LexError> {
    let tokens = tokenize(pattern);
    match tokens.iter().find_map(|t| match t.kind {
        TokenKind::Error(kind) => Some(LexError {
            kind,
            offset: t.offset,
        }),
        _ => None,
    }) {
        Some(err) => Err(err),
        None => Ok(tokens),
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    pos: usize,
}

impl Lexer<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += 1;
        Some(c)
    }

    fn next_token(&mut self) -> Option<Token> {
        let offset = self.pos;
        let c = self.bump()?;
        let mut text = String::from(c);

        let kind = if let Some(kind) = SYMBOLS.get(&c) {
            kind.clone()
        } else {
            match c {
                '{' => self.counter(&mut text),
                '\\' => self.escape(&mut text),
                _ => {
                    while let Some(&next) = self.chars.peek() {
                        if is_special(next) {
                            break;
                        }
                        text.push(next);
                        self.bump();
                    }
                    TokenKind::Literal
                }
            }
        };
        Some(Token { kind, text, offset })
    }

    /// Lex the rest of `{n}` (the `{` has already been consumed).
    fn counter(&mut self, text: &mut String) -> TokenKind {
        let mut digits = String::new();
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.bump();
        }
        text.push_str(&digits);
        if digits.is_empty() || self.chars.peek() != Some(&'}') {
            return TokenKind::Error(LexErrorKind::UnterminatedCounter);
        }
        self.bump();
        text.push('}');
        match digits.parse::<usize>() {
            Ok(n) => TokenKind::Counter(n),
            Err(_) => TokenKind::Error(LexErrorKind::UnterminatedCounter),
        }
    }

    /// Lex the character after `\` (the `\` has already been consumed).
    fn escape(&mut self, text: &mut String) -> TokenKind {
        let Some(c) = self.bump() else {
            return TokenKind::Error(LexErrorKind::UnrecognisedEscape(None));
        };
        text.push(c);
        ESCAPES
            .get(&c)
            .cloned()
            .unwrap_or(TokenKind::Error(LexErrorKind::UnrecognisedEscape(Some(c))))
    }
}
