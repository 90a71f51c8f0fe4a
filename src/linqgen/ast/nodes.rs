//! Generic nodes
//!
//!     [Node] is the closed variant type every sequence in the tree is made of. Bracket
//!     groups own their delimiters so that the tree can always be printed back, and the
//!     structured variants own every token they were built from.

use super::class::ClassDecl;
use super::types::TypeRef;
use crate::linqgen::token::{SyntaxToken, TokenKind};

/// The kind of bracket enclosing a [Group]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
    /// A template literal with substitutions: the head opens it, the tail closes it, and
    /// the children are the substitutions separated by the middle pieces
    Template,
}

impl Delimiter {
    pub fn from_open(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::OpenParen => Some(Delimiter::Paren),
            TokenKind::OpenBracket => Some(Delimiter::Bracket),
            TokenKind::OpenBrace => Some(Delimiter::Brace),
            TokenKind::TemplateHead => Some(Delimiter::Template),
            _ => None,
        }
    }

    pub fn close_kind(&self) -> TokenKind {
        match self {
            Delimiter::Paren => TokenKind::CloseParen,
            Delimiter::Bracket => TokenKind::CloseBracket,
            Delimiter::Brace => TokenKind::CloseBrace,
            Delimiter::Template => TokenKind::TemplateTail,
        }
    }

    pub fn open_kind(&self) -> TokenKind {
        match self {
            Delimiter::Paren => TokenKind::OpenParen,
            Delimiter::Bracket => TokenKind::OpenBracket,
            Delimiter::Brace => TokenKind::OpenBrace,
            Delimiter::Template => TokenKind::TemplateHead,
        }
    }

    pub fn open_text(&self) -> &'static str {
        match self {
            Delimiter::Paren => "(",
            Delimiter::Bracket => "[",
            Delimiter::Brace => "{",
            Delimiter::Template => "`${",
        }
    }

    pub fn close_text(&self) -> &'static str {
        match self {
            Delimiter::Paren => ")",
            Delimiter::Bracket => "]",
            Delimiter::Brace => "}",
            Delimiter::Template => "}`",
        }
    }
}

/// A bracketed sequence of nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub delimiter: Delimiter,
    pub open: SyntaxToken,
    pub children: Vec<Node>,
    pub close: SyntaxToken,
}

impl Group {
    /// Build a synthetic group; `leading` is the trivia in front of the opening bracket
    pub fn new(delimiter: Delimiter, leading: &str, children: Vec<Node>, close_leading: &str) -> Self {
        Self {
            delimiter,
            open: SyntaxToken::new(delimiter.open_kind(), delimiter.open_text(), leading),
            children,
            close: SyntaxToken::new(delimiter.close_kind(), delimiter.close_text(), close_leading),
        }
    }

    /// Same delimiters, different children
    pub fn with_children(&self, children: Vec<Node>) -> Self {
        Self {
            delimiter: self.delimiter,
            open: self.open.clone(),
            children,
            close: self.close.clone(),
        }
    }
}

/// `for [await] (head)`; the loop body follows as sibling nodes
#[derive(Debug, Clone, PartialEq)]
pub struct ForOf {
    pub for_keyword: SyntaxToken,
    pub await_keyword: Option<SyntaxToken>,
    pub head: Group,
}

/// `await operand`
#[derive(Debug, Clone, PartialEq)]
pub struct AwaitExpr {
    pub keyword: SyntaxToken,
    pub operand: Vec<Node>,
}

/// `object.name` where `object` is a bare identifier or `this`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAccess {
    pub object: SyntaxToken,
    pub dot: SyntaxToken,
    pub name: SyntaxToken,
}

impl PropertyAccess {
    /// Check for `object.name` spelled exactly so
    pub fn is(&self, object: &str, name: &str) -> bool {
        self.object.text == object && self.name.text == name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Token(SyntaxToken),
    Group(Group),
    Class(ClassDecl),
    ForOf(ForOf),
    Await(AwaitExpr),
    PropertyAccess(PropertyAccess),
    TypeRef(TypeRef),
}

impl Node {
    pub fn as_token(&self) -> Option<&SyntaxToken> {
        match self {
            Node::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_token(&self, kind: TokenKind) -> bool {
        matches!(self, Node::Token(token) if token.kind == kind)
    }

    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Node::Token(token) if token.is_word(word))
    }

    pub fn is_group(&self, delimiter: Delimiter) -> bool {
        matches!(self, Node::Group(group) if group.delimiter == delimiter)
    }

    /// The first token printed for this node
    pub fn first_token(&self) -> &SyntaxToken {
        match self {
            Node::Token(token) => token,
            Node::Group(group) => &group.open,
            Node::Class(class) => &class.keyword,
            Node::ForOf(for_of) => &for_of.for_keyword,
            Node::Await(await_expr) => &await_expr.keyword,
            Node::PropertyAccess(access) => &access.object,
            Node::TypeRef(type_ref) => type_ref.first_token(),
        }
    }

    pub fn first_token_mut(&mut self) -> &mut SyntaxToken {
        match self {
            Node::Token(token) => token,
            Node::Group(group) => &mut group.open,
            Node::Class(class) => &mut class.keyword,
            Node::ForOf(for_of) => &mut for_of.for_keyword,
            Node::Await(await_expr) => &mut await_expr.keyword,
            Node::PropertyAccess(access) => &mut access.object,
            Node::TypeRef(type_ref) => type_ref.first_token_mut(),
        }
    }

    /// Leading trivia of the node
    pub fn leading(&self) -> &str {
        &self.first_token().leading
    }

    /// Offset of the node in its source, if it was lexed
    pub fn offset(&self) -> Option<usize> {
        self.first_token().offset
    }
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub file_name: String,
    pub nodes: Vec<Node>,
    /// Trivia after the last token
    pub trailing: String,
}

impl SourceFile {
    /// Base name of the file (`template/enumerable.ts` gives `enumerable.ts`)
    pub fn base_name(&self) -> &str {
        self.file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_name)
    }

    /// Same file name and trailing trivia, different nodes
    pub fn with_nodes(&self, nodes: Vec<Node>) -> Self {
        Self {
            file_name: self.file_name.clone(),
            nodes,
            trailing: self.trailing.clone(),
        }
    }
}

/// Replace the leading trivia of the first token of `nodes`, following
/// [inherit_trivia](crate::linqgen::token::inherit_trivia)
pub fn inherit_leading(nodes: &mut [Node], dropped: &str) {
    if let Some(first) = nodes.first_mut() {
        let token = first.first_token_mut();
        token.leading = crate::linqgen::token::inherit_trivia(dropped, &token.leading);
    }
}
