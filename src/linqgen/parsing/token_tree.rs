//! Token tree building
//!
//!     Matches `()`, `[]` and `{}` pairs and nests the tokens between them into [Group]s.
//!     A template literal with substitutions is grouped the same way, from its head to its
//!     tail, with the middle pieces kept as tokens between the substitutions.
//!     Angle brackets are not grouped here: whether `<` opens a type argument list depends
//!     on context, which the structural passes decide later.

use super::{ParseErrorKind, RawError};
use crate::linqgen::ast::{Delimiter, Group, Node};
use crate::linqgen::token::{SyntaxToken, TokenKind};

struct Frame {
    delimiter: Delimiter,
    open: SyntaxToken,
    children: Vec<Node>,
}

/// Build the token tree for a token stream
pub fn build(tokens: Vec<SyntaxToken>) -> Result<Vec<Node>, RawError> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut top: Vec<Node> = Vec::new();

    for token in tokens {
        if let Some(delimiter) = Delimiter::from_open(token.kind) {
            stack.push(Frame {
                delimiter,
                open: token,
                children: Vec::new(),
            });
            continue;
        }

        if token.is(TokenKind::TemplateMiddle) {
            match stack.last_mut() {
                Some(frame) if frame.delimiter == Delimiter::Template => {
                    frame.children.push(Node::Token(token));
                    continue;
                }
                Some(frame) => {
                    return Err(RawError::new(
                        ParseErrorKind::Mismatched {
                            found: token.text.clone(),
                            expected: frame.delimiter.close_text(),
                        },
                        token.offset,
                    ))
                }
                None => {
                    return Err(RawError::new(
                        ParseErrorKind::Unexpected {
                            found: token.text.clone(),
                            context: "the source",
                        },
                        token.offset,
                    ))
                }
            }
        }

        if token.kind.is_close_delimiter() {
            let Some(frame) = stack.pop() else {
                return Err(RawError::new(
                    ParseErrorKind::Unexpected {
                        found: token.text.clone(),
                        context: "the source",
                    },
                    token.offset,
                ));
            };
            if frame.delimiter.close_kind() != token.kind {
                return Err(RawError::new(
                    ParseErrorKind::Mismatched {
                        found: token.text.clone(),
                        expected: frame.delimiter.close_text(),
                    },
                    token.offset,
                ));
            }
            let group = Node::Group(Group {
                delimiter: frame.delimiter,
                open: frame.open,
                children: frame.children,
                close: token,
            });
            match stack.last_mut() {
                Some(parent) => parent.children.push(group),
                None => top.push(group),
            }
            continue;
        }

        match stack.last_mut() {
            Some(parent) => parent.children.push(Node::Token(token)),
            None => top.push(Node::Token(token)),
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(RawError::new(
            ParseErrorKind::Unclosed {
                open: frame.open.text.clone(),
            },
            frame.open.offset,
        ));
    }

    Ok(top)
}
