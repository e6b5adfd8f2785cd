//! Reader for Valve's tagged key-value text format.
//!
//! Manifests and the library index share one shape: a single named root
//! block whose children are either nested blocks or quoted scalar values.
//! The node model keeps lookups optional-returning so consumers degrade to
//! typed errors instead of panicking on a wrong-variant access.

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

/// One node of the parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Named children in document order. Keys may repeat; lookups return the
    /// first match.
    Object(Vec<(String, Node)>),
    Scalar(String),
}

impl Node {
    /// First child with the given name, if this node is an object.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Object(entries) => entries
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, node)| node),
            Node::Scalar(_) => None,
        }
    }

    /// Value of the named child when it exists and is a scalar.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(Node::as_scalar)
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(value) => Some(value),
            Node::Object(_) => None,
        }
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    /// Children in document order; empty for scalar nodes.
    #[must_use]
    pub fn entries(&self) -> &[(String, Node)] {
        match self {
            Node::Object(entries) => entries,
            Node::Scalar(_) => &[],
        }
    }
}

/// A parsed document: one named root block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub root: Node,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input at line {line}")]
    UnexpectedEof { line: usize },

    #[error("unexpected `{found}` at line {line}")]
    UnexpectedToken { found: String, line: usize },
}

/// Parse a complete document with a single named root block.
///
/// # Errors
/// Returns a `ParseError` when the input ends early, a brace is unbalanced,
/// or a token appears where the grammar does not allow it.
pub fn parse_document(input: &str) -> Result<Document, ParseError> {
    let mut lexer = Lexer::new(input);

    let name = match lexer.next_token()? {
        Some(Token::Text(name)) => name,
        Some(token) => {
            return Err(ParseError::UnexpectedToken {
                found: token.describe(),
                line: lexer.line,
            });
        }
        None => return Err(ParseError::UnexpectedEof { line: lexer.line }),
    };

    match lexer.next_token()? {
        Some(Token::OpenBrace) => {}
        Some(token) => {
            return Err(ParseError::UnexpectedToken {
                found: token.describe(),
                line: lexer.line,
            });
        }
        None => return Err(ParseError::UnexpectedEof { line: lexer.line }),
    }

    let root = parse_object(&mut lexer)?;

    match lexer.next_token()? {
        None => Ok(Document { name, root }),
        Some(token) => Err(ParseError::UnexpectedToken {
            found: token.describe(),
            line: lexer.line,
        }),
    }
}

fn parse_object(lexer: &mut Lexer<'_>) -> Result<Node, ParseError> {
    let mut entries = Vec::new();

    loop {
        match lexer.next_token()? {
            Some(Token::CloseBrace) => return Ok(Node::Object(entries)),
            Some(Token::Text(key)) => match lexer.next_token()? {
                Some(Token::OpenBrace) => entries.push((key, parse_object(lexer)?)),
                Some(Token::Text(value)) => entries.push((key, Node::Scalar(value))),
                Some(Token::CloseBrace) => {
                    return Err(ParseError::UnexpectedToken {
                        found: "}".to_string(),
                        line: lexer.line,
                    });
                }
                None => return Err(ParseError::UnexpectedEof { line: lexer.line }),
            },
            Some(Token::OpenBrace) => {
                return Err(ParseError::UnexpectedToken {
                    found: "{".to_string(),
                    line: lexer.line,
                });
            }
            None => return Err(ParseError::UnexpectedEof { line: lexer.line }),
        }
    }
}

enum Token {
    OpenBrace,
    CloseBrace,
    Text(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::OpenBrace => "{".to_string(),
            Token::CloseBrace => "}".to_string(),
            Token::Text(text) => text.clone(),
        }
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_whitespace_and_comments();

        match self.chars.next() {
            None => Ok(None),
            Some('{') => Ok(Some(Token::OpenBrace)),
            Some('}') => Ok(Some(Token::CloseBrace)),
            Some('"') => Ok(Some(Token::Text(self.read_quoted()?))),
            Some(first) => Ok(Some(Token::Text(self.read_bare(first)))),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while let Some(&ch) = self.chars.peek() {
                if !ch.is_whitespace() {
                    break;
                }
                if ch == '\n' {
                    self.line += 1;
                }
                self.chars.next();
            }

            // Line comments, as emitted by some client versions.
            let mut ahead = self.chars.clone();
            if ahead.next() == Some('/') && ahead.next() == Some('/') {
                while let Some(&ch) = self.chars.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.chars.next();
                }
            } else {
                return;
            }
        }
    }

    fn read_quoted(&mut self) -> Result<String, ParseError> {
        let mut text = String::new();

        loop {
            match self.chars.next() {
                None => return Err(ParseError::UnexpectedEof { line: self.line }),
                Some('"') => return Ok(text),
                Some('\n') => {
                    self.line += 1;
                    text.push('\n');
                }
                Some('\\') => match self.chars.next() {
                    None => return Err(ParseError::UnexpectedEof { line: self.line }),
                    Some('\\') => text.push('\\'),
                    Some('"') => text.push('"'),
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(other) => {
                        text.push('\\');
                        text.push(other);
                    }
                },
                Some(ch) => text.push(ch),
            }
        }
    }

    fn read_bare(&mut self, first: char) -> String {
        let mut text = String::from(first);
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || ch == '{' || ch == '}' || ch == '"' {
                break;
            }
            text.push(ch);
            self.chars.next();
        }
        text
    }
}
