//! Token definitions for TypeScript sources
//!
//!     The generator only needs a lossless view of the template and skeleton files, so the
//!     token set is deliberately coarse: keywords are plain identifiers (their meaning is
//!     decided by the parser from their text), and most operators share a single kind.
//!
//!     Whitespace and comments are lexed as tokens by logos but never reach the parser. The
//!     tokenizer folds them into the leading trivia of the next significant token, see
//!     [SyntaxToken]. Printing a token is always `leading + text`, which is what makes a
//!     parse/print round-trip reproduce the input byte for byte.
//!
//! Angle Brackets
//!
//!     `>` is always a single token. `>>`, `>=` and `>>>` are produced as consecutive tokens
//!     with empty trivia between them, which keeps nested type argument lists such as
//!     `Map<K, Array<V>>` easy to close and still prints the original text.
use logos::Logos;
use std::fmt;

/// All token kinds produced by the lexer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Trivia
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // Words and literals
    #[regex(r"[A-Za-z_$\u{80}-\u{10FFFF}][A-Za-z0-9_$\u{80}-\u{10FFFF}]*")]
    Identifier,
    #[regex(r"#[A-Za-z_$][A-Za-z0-9_$]*")]
    PrivateName,
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?n?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xXoObB][0-9a-fA-F_]+n?")]
    Number,
    #[regex(r#""([^"\\\n]|\\.|\\\n)*""#)]
    #[regex(r"'([^'\\\n]|\\.|\\\n)*'")]
    String,
    /// A template literal without substitutions, `` `text` ``
    ///
    /// logos only matches the opening backtick. The rest of the literal, and the `head`,
    /// `middle` and `tail` pieces around substitutions, are scanned by the lexer driver in
    /// [crate::linqgen::lexing], which knows which `}` closes a `${`.
    #[token("`")]
    Template,
    /// `` `text${ ``
    TemplateHead,
    /// `}text${`
    TemplateMiddle,
    /// `` }text` ``
    TemplateTail,
    /// `/pattern/flags`, recognized by the lexer driver where an operand is expected
    RegexLiteral,

    // Delimiters
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,

    // Punctuation with a structural role
    #[token(".")]
    Dot,
    #[token("?.")]
    QuestionDot,
    #[token("...")]
    Ellipsis,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("!")]
    Bang,
    #[token("@")]
    At,
    #[token("*")]
    Asterisk,
    #[token("=")]
    Equals,
    #[token("=>")]
    Arrow,
    #[token("|")]
    Pipe,
    #[token("&")]
    Ampersand,

    // Everything else the parser never inspects
    #[token("+")]
    #[token("-")]
    #[token("/")]
    #[token("%")]
    #[token("^")]
    #[token("~")]
    #[token("**")]
    #[token("++")]
    #[token("--")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("^=")]
    #[token("&=")]
    #[token("|=")]
    #[token("**=")]
    #[token("&&")]
    #[token("||")]
    #[token("??")]
    #[token("&&=")]
    #[token("||=")]
    #[token("??=")]
    #[token("==")]
    #[token("===")]
    #[token("!=")]
    #[token("!==")]
    #[token("<=")]
    #[token("<<")]
    #[token("<<=")]
    Operator,

    /// Input logos could not match; kept so that printing stays lossless
    Unknown,
}

/// Extend a `/*` match up to and including the first `*/`
///
/// An unterminated comment takes the rest of the input and is reported as an error, which
/// the tokenizer keeps as an [TokenKind::Unknown] token.
fn block_comment(lexer: &mut logos::Lexer<TokenKind>) -> bool {
    match lexer.remainder().find("*/") {
        Some(end) => {
            lexer.bump(end + 2);
            true
        }
        None => {
            lexer.bump(lexer.remainder().len());
            false
        }
    }
}

impl TokenKind {
    /// Check if this kind is folded into trivia instead of becoming a token
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Check if this kind opens a bracket group
    pub fn is_open_delimiter(&self) -> bool {
        matches!(
            self,
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace
        )
    }

    /// Check if this kind closes a bracket group
    pub fn is_close_delimiter(&self) -> bool {
        matches!(
            self,
            TokenKind::CloseParen
                | TokenKind::CloseBracket
                | TokenKind::CloseBrace
                | TokenKind::TemplateTail
        )
    }

    /// Check if this kind is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::String | TokenKind::Template | TokenKind::RegexLiteral
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::LineComment => "line-comment",
            TokenKind::BlockComment => "block-comment",
            TokenKind::Identifier => "identifier",
            TokenKind::PrivateName => "private-name",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Template => "template",
            TokenKind::TemplateHead => "template-head",
            TokenKind::TemplateMiddle => "template-middle",
            TokenKind::TemplateTail => "template-tail",
            TokenKind::RegexLiteral => "regex",
            TokenKind::OpenParen => "open-paren",
            TokenKind::CloseParen => "close-paren",
            TokenKind::OpenBracket => "open-bracket",
            TokenKind::CloseBracket => "close-bracket",
            TokenKind::OpenBrace => "open-brace",
            TokenKind::CloseBrace => "close-brace",
            TokenKind::LessThan => "less-than",
            TokenKind::GreaterThan => "greater-than",
            TokenKind::Dot => "dot",
            TokenKind::QuestionDot => "question-dot",
            TokenKind::Ellipsis => "ellipsis",
            TokenKind::Comma => "comma",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Colon => "colon",
            TokenKind::Question => "question",
            TokenKind::Bang => "bang",
            TokenKind::At => "at",
            TokenKind::Asterisk => "asterisk",
            TokenKind::Equals => "equals",
            TokenKind::Arrow => "arrow",
            TokenKind::Pipe => "pipe",
            TokenKind::Ampersand => "ampersand",
            TokenKind::Operator => "operator",
            TokenKind::Unknown => "unknown",
        };
        write!(f, "<{}>", name)
    }
}

/// A significant token with the trivia that precedes it
///
/// `offset` is the byte offset of `text` in the source it was lexed from, `None` for tokens
/// synthesized by the generator. It is used for error messages only and is ignored by
/// equality, so a rewritten tree compares equal to a freshly parsed one.
#[derive(Debug, Clone, Eq)]
pub struct SyntaxToken {
    pub kind: TokenKind,
    pub text: String,
    pub leading: String,
    pub offset: Option<usize>,
}

impl SyntaxToken {
    pub fn new(kind: TokenKind, text: impl Into<String>, leading: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            leading: leading.into(),
            offset: None,
        }
    }

    /// Preferred builder for lexed tokens
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn identifier(text: impl Into<String>, leading: impl Into<String>) -> Self {
        Self::new(TokenKind::Identifier, text, leading)
    }

    pub fn punct(kind: TokenKind, text: &str) -> Self {
        Self::new(kind, text, "")
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Check if this token is the identifier (or keyword) `word`
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == word
    }

    /// Check if a line break precedes this token
    pub fn starts_line(&self) -> bool {
        self.leading.contains('\n')
    }

    /// A copy of this token with different text, keeping kind and trivia
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            text: text.into(),
            leading: self.leading.clone(),
            offset: self.offset,
        }
    }

    /// A copy of this token with different leading trivia
    pub fn with_leading(&self, leading: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            text: self.text.clone(),
            leading: leading.into(),
            offset: self.offset,
        }
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text && self.leading == other.leading
    }
}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.leading, self.text)
    }
}

/// Merge the trivia of a dropped token into the token that takes its place
///
/// The dropped token's trivia wins when the replacement only had whitespace in front of it
/// (`!await predicate` becomes `!predicate`, `for await (` becomes `for (`). Comments in front
/// of the replacement are kept after the inherited trivia.
pub fn inherit_trivia(dropped: &str, replacement: &str) -> String {
    if replacement.trim().is_empty() {
        dropped.to_string()
    } else {
        format!("{}{}", dropped, replacement.trim_start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        TokenKind::lexer(source)
            .map(|result| result.unwrap_or(TokenKind::Unknown))
            .collect()
    }

    #[test]
    fn test_keywords_are_identifiers() {
        assert_eq!(
            kinds("async await"),
            vec![
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn test_greater_than_is_never_combined() {
        assert_eq!(
            kinds(">>="),
            vec![
                TokenKind::GreaterThan,
                TokenKind::GreaterThan,
                TokenKind::Equals
            ]
        );
    }

    #[test]
    fn test_arrow_and_comparisons() {
        assert_eq!(
            kinds("=> === <= <"),
            vec![
                TokenKind::Arrow,
                TokenKind::Whitespace,
                TokenKind::Operator,
                TokenKind::Whitespace,
                TokenKind::Operator,
                TokenKind::Whitespace,
                TokenKind::LessThan
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("// line\n/* block * */x"),
            vec![
                TokenKind::LineComment,
                TokenKind::Whitespace,
                TokenKind::BlockComment,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn test_doc_comments() {
        assert_eq!(
            kinds("/** doc */x/* a **/y/***/z"),
            vec![
                TokenKind::BlockComment,
                TokenKind::Identifier,
                TokenKind::BlockComment,
                TokenKind::Identifier,
                TokenKind::BlockComment,
                TokenKind::Identifier
            ]
        );
        let mut lexer = TokenKind::lexer("/**\n * @override\n */ get");
        assert_eq!(lexer.next(), Some(Ok(TokenKind::BlockComment)));
        assert_eq!(lexer.slice(), "/**\n * @override\n */");
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut lexer = TokenKind::lexer("x /* open");
        assert_eq!(lexer.next(), Some(Ok(TokenKind::Identifier)));
        assert_eq!(lexer.next(), Some(Ok(TokenKind::Whitespace)));
        assert_eq!(lexer.next(), Some(Err(())));
        assert_eq!(lexer.slice(), "/* open");
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"1.5 "a\"b" 'c' `"#),
            vec![
                TokenKind::Number,
                TokenKind::Whitespace,
                TokenKind::String,
                TokenKind::Whitespace,
                TokenKind::String,
                TokenKind::Whitespace,
                TokenKind::Template
            ]
        );
    }

    #[test]
    fn test_spread_and_optional_chain() {
        assert_eq!(
            kinds("...a?.b"),
            vec![
                TokenKind::Ellipsis,
                TokenKind::Identifier,
                TokenKind::QuestionDot,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn test_token_display_format() {
        assert_eq!(format!("{}", TokenKind::Identifier), "<identifier>");
        assert_eq!(format!("{}", TokenKind::OpenBrace), "<open-brace>");
        assert_eq!(format!("{}", TokenKind::Arrow), "<arrow>");
    }

    #[test]
    fn test_equality_ignores_offset() {
        let lexed = SyntaxToken::identifier("x", " ").at(10);
        let synthetic = SyntaxToken::identifier("x", " ");
        assert_eq!(lexed, synthetic);
        assert_ne!(lexed, synthetic.with_leading(""));
    }

    #[test]
    fn test_inherit_trivia() {
        assert_eq!(inherit_trivia("", " "), "");
        assert_eq!(inherit_trivia(" ", " "), " ");
        assert_eq!(inherit_trivia(" ", " /* c */ "), " /* c */ ");
    }
}
