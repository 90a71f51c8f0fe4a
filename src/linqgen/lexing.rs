//! Lexer
//!
//! This module turns TypeScript source text into [SyntaxToken]s.
//!
//! Structure:
//!     The raw tokenization is done by the logos lexer ([TokenKind]). This pass then folds
//!     whitespace and comments into the leading trivia of the following significant token.
//!     Trivia left after the last token is returned separately as the trailing trivia of the
//!     file, so no character of the input is lost.
//!
//!     Input logos cannot match (a stray backslash, control characters...) becomes a [TokenKind::Unknown]
//!     token. The parser treats those as opaque and the printer writes them back unchanged.
//!
//! Context-dependent tokens:
//!     Two constructs cannot be lexed without knowing what came before, so the driver around
//!     logos scans them itself and restarts logos after them:
//!
//!         - Template literals. A backtick starts a literal, which ends at the next backtick
//!           ([TokenKind::Template]) or is cut at each `${` into a head, middles and a tail.
//!           The driver keeps a stack of open braces to know which `}` resumes the literal.
//!         - Regex literals. A `/` where an operand is expected starts a
//!           [TokenKind::RegexLiteral]; anywhere else it is division.

use crate::linqgen::token::{SyntaxToken, TokenKind};
use logos::{Logos, Span};

/// Keywords after which a `/` starts a regex literal
const REGEX_PRECEDING_WORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

/// Output of the lexer: significant tokens plus trailing trivia
#[derive(Debug, Clone, PartialEq)]
pub struct LexerOutput {
    pub tokens: Vec<SyntaxToken>,
    pub trailing: String,
}

/// Raw tokenization, trivia included
///
/// Unmatched input is reported as [TokenKind::Unknown] with its span.
pub fn tokenize_raw(source: &str) -> Vec<(TokenKind, Span)> {
    RawLexer::new(source).run()
}

/// What an open `{` on the driver's stack belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brace {
    Block,
    Substitution,
}

struct RawLexer<'a> {
    source: &'a str,
    tokens: Vec<(TokenKind, Span)>,
    braces: Vec<Brace>,
}

impl<'a> RawLexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            braces: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<(TokenKind, Span)> {
        let mut start = 0;
        while start < self.source.len() {
            start = self.run_logos(start);
        }
        self.tokens
    }

    /// Lex with logos from `start` until a token needs the driver; returns where to resume
    fn run_logos(&mut self, start: usize) -> usize {
        let mut lexer = TokenKind::lexer(&self.source[start..]);

        while let Some(result) = lexer.next() {
            let span = start + lexer.span().start..start + lexer.span().end;
            let kind = result.unwrap_or(TokenKind::Unknown);
            match kind {
                TokenKind::Template => return self.template_piece(span.start, false),
                TokenKind::OpenBrace => self.braces.push(Brace::Block),
                TokenKind::CloseBrace => {
                    if self.braces.pop() == Some(Brace::Substitution) {
                        return self.template_piece(span.start, true);
                    }
                }
                TokenKind::Operator if self.source[span.clone()].starts_with('/') && self.regex_allowed() => {
                    if let Some(end) = regex_end(self.source, span.start) {
                        self.tokens.push((TokenKind::RegexLiteral, span.start..end));
                        return end;
                    }
                }
                _ => {}
            }
            self.tokens.push((kind, span));
        }

        self.source.len()
    }

    /// Scan a template piece starting at the backtick or the `}` at `start`
    fn template_piece(&mut self, start: usize, resumed: bool) -> usize {
        let bytes = self.source.as_bytes();
        let mut position = start + 1;

        while position < bytes.len() {
            match bytes[position] {
                b'\\' => position += 2,
                b'`' => {
                    let kind = if resumed {
                        TokenKind::TemplateTail
                    } else {
                        TokenKind::Template
                    };
                    self.tokens.push((kind, start..position + 1));
                    return position + 1;
                }
                b'$' if bytes.get(position + 1) == Some(&b'{') => {
                    let kind = if resumed {
                        TokenKind::TemplateMiddle
                    } else {
                        TokenKind::TemplateHead
                    };
                    self.tokens.push((kind, start..position + 2));
                    self.braces.push(Brace::Substitution);
                    return position + 2;
                }
                _ => position += 1,
            }
        }

        self.tokens.push((TokenKind::Unknown, start..self.source.len()));
        self.source.len()
    }

    /// Check if the last significant token leaves room for an operand
    fn regex_allowed(&self) -> bool {
        let previous = self.tokens.iter().rev().find(|(kind, _)| !kind.is_trivia());
        let Some((kind, span)) = previous else {
            return true;
        };
        let text = &self.source[span.clone()];
        match kind {
            TokenKind::Identifier => REGEX_PRECEDING_WORDS.contains(&text),
            TokenKind::Operator => !matches!(text, "++" | "--"),
            TokenKind::CloseParen
            | TokenKind::CloseBracket
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Template
            | TokenKind::TemplateTail
            | TokenKind::RegexLiteral
            | TokenKind::PrivateName
            | TokenKind::Unknown => false,
            _ => true,
        }
    }
}

/// End (exclusive) of the regex literal whose opening `/` is at `start`
///
/// Returns `None` when the line ends first, in which case the `/` is division after all.
fn regex_end(source: &str, start: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut position = start + 1;
    let mut in_class = false;

    loop {
        match *bytes.get(position)? {
            b'\n' | b'\r' => return None,
            b'\\' => position += 2,
            b'[' => {
                in_class = true;
                position += 1;
            }
            b']' => {
                in_class = false;
                position += 1;
            }
            b'/' if !in_class => break,
            _ => position += 1,
        }
    }

    position += 1;
    while bytes.get(position).is_some_and(u8::is_ascii_alphabetic) {
        position += 1;
    }
    Some(position)
}

/// Tokenize source text, attaching trivia to the significant tokens
pub fn tokenize(source: &str) -> LexerOutput {
    let mut tokens = Vec::new();
    let mut pending = String::new();

    for (kind, span) in tokenize_raw(source) {
        let text = source.get(span.clone()).unwrap_or_default();
        if kind.is_trivia() {
            pending.push_str(text);
            continue;
        }
        tokens.push(SyntaxToken::new(kind, text, std::mem::take(&mut pending)).at(span.start));
    }

    LexerOutput {
        tokens,
        trailing: pending,
    }
}

/// Convert a byte offset into a 1-based (line, column) pair for diagnostics
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(newline) => offset - newline,
        None => offset + 1,
    };
    (line, column)
}
