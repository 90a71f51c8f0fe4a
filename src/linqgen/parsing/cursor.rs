//! Cursor over a node sequence
//!
//! All structured parsing works on node slices produced by the token tree builder, so
//! brackets are already balanced and a group is always a single step.

use super::{RawError, ParseErrorKind};
use crate::linqgen::ast::{Delimiter, Group, Node};
use crate::linqgen::token::{SyntaxToken, TokenKind};

pub struct Cursor<'a> {
    nodes: &'a [Node],
    pos: usize,
    /// Offset reported when an error happens at the end of the slice
    end_offset: Option<usize>,
}

impl<'a> Cursor<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            nodes,
            pos: 0,
            end_offset: None,
        }
    }

    /// A cursor over a group's children; errors at the end point at the closing bracket
    pub fn in_group(group: &'a Group) -> Self {
        Self {
            nodes: &group.children,
            pos: 0,
            end_offset: group.close.offset,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.nodes.len()
    }

    pub fn peek(&self) -> Option<&'a Node> {
        self.nodes.get(self.pos)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&'a Node> {
        self.nodes.get(self.pos + n)
    }

    pub fn peek_token(&self) -> Option<&'a SyntaxToken> {
        self.peek().and_then(Node::as_token)
    }

    pub fn peek_group(&self, delimiter: Delimiter) -> Option<&'a Group> {
        match self.peek() {
            Some(Node::Group(group)) if group.delimiter == delimiter => Some(group),
            _ => None,
        }
    }

    pub fn bump(&mut self) -> Option<&'a Node> {
        let node = self.nodes.get(self.pos);
        if node.is_some() {
            self.pos += 1;
        }
        node
    }

    /// Nodes between `start` and the current position
    pub fn since(&self, start: usize) -> &'a [Node] {
        &self.nodes[start..self.pos]
    }

    pub fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|node| node.is_token(kind))
    }

    pub fn at_word(&self, word: &str) -> bool {
        self.peek().is_some_and(|node| node.is_word(word))
    }

    pub fn eat_kind(&mut self, kind: TokenKind) -> Option<SyntaxToken> {
        if self.at_kind(kind) {
            self.bump().and_then(Node::as_token).cloned()
        } else {
            None
        }
    }

    pub fn eat_word(&mut self, word: &str) -> Option<SyntaxToken> {
        if self.at_word(word) {
            self.bump().and_then(Node::as_token).cloned()
        } else {
            None
        }
    }

    pub fn expect_kind(&mut self, kind: TokenKind, context: &'static str) -> Result<SyntaxToken, RawError> {
        match self.eat_kind(kind) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(context)),
        }
    }

    /// Offset of the current node, or of the end of the slice
    pub fn offset(&self) -> Option<usize> {
        match self.peek() {
            Some(node) => node.offset(),
            None => self.end_offset,
        }
    }

    /// An error describing the current node
    pub fn unexpected(&self, context: &'static str) -> RawError {
        let kind = match self.peek() {
            Some(node) => ParseErrorKind::Unexpected {
                found: node.first_token().text.clone(),
                context,
            },
            None => ParseErrorKind::UnexpectedEnd { context },
        };
        RawError::new(kind, self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> Vec<Node> {
        vec![
            Node::Token(SyntaxToken::identifier("public", "").at(0)),
            Node::Token(SyntaxToken::new(TokenKind::Colon, ":", "").at(6)),
        ]
    }

    #[test]
    fn test_eat_and_peek() {
        let nodes = nodes();
        let mut cursor = Cursor::new(&nodes);
        assert!(cursor.at_word("public"));
        assert!(cursor.eat_kind(TokenKind::Colon).is_none());
        assert_eq!(cursor.eat_word("public").map(|t| t.text), Some("public".to_string()));
        assert_eq!(cursor.offset(), Some(6));
        assert!(cursor.expect_kind(TokenKind::Colon, "a type annotation").is_ok());
        assert!(cursor.is_at_end());
        assert_eq!(cursor.since(0).len(), 2);
    }

    #[test]
    fn test_unexpected_at_end() {
        let nodes = nodes();
        let mut cursor = Cursor::new(&nodes);
        cursor.reset(2);
        let error = cursor.unexpected("a type");
        assert_eq!(error.kind, ParseErrorKind::UnexpectedEnd { context: "a type" });
        assert_eq!(error.offset, None);
    }
}
