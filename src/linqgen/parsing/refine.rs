//! Structural refinement
//!
//!     Walks a node sequence of the token tree and replaces the constructs the generator
//!     rewrites with structured nodes. Groups are refined recursively, so after this pass
//!     every sequence in the tree has been visited exactly once.
//!
//! Recognized Constructs
//!
//!     - `class Name<...> extends ... { ... }`: a [ClassDecl], both as a declaration and as
//!       an expression. `class` used as a property name is left alone.
//!     - `for (... of ...)` and `for await (...)`: a [ForOf]. Classic `for (;;)` loops are
//!       left alone.
//!     - `await operand`: an [AwaitExpr]. The operand is one unary expression, including
//!       member accesses, calls and non-null assertions chained to it.
//!     - `Name<Args>` written without a space before `<`: a [TypeRef], provided the argument
//!       list parses as types and is followed by something that can follow a type.
//!     - `object.name` on a bare identifier or `this`: a [PropertyAccess].
//!
//!     Template literal substitutions are groups like any other, so all of the above are
//!     recognized inside `${...}` too.
//!
//!     None of these are recognized right after a `.` or `?.`, where the keyword is a
//!     property name.

use super::cursor::Cursor;
use super::{members, types, RawError};
use crate::linqgen::ast::{AwaitExpr, ClassDecl, Delimiter, ForOf, Group, Node, PropertyAccess};
use crate::linqgen::token::{SyntaxToken, TokenKind};

/// Identifiers that never start an operand
const OPERATOR_WORDS: &[&str] = &["in", "of", "instanceof", "as", "satisfies"];

/// Prefix operators an await operand may start with
const PREFIX_WORDS: &[&str] = &["typeof", "void", "delete", "await", "new"];

/// Refine a node sequence; `parent` is the delimiter of the enclosing group, if any
pub fn refine(nodes: &[Node], parent: Option<Delimiter>) -> Result<Vec<Node>, RawError> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    let mut index = 0;

    while index < nodes.len() {
        let structured = match &nodes[index] {
            Node::Group(group) => Some((Node::Group(refine_group(group)?), 1)),
            Node::Token(token) if token.is(TokenKind::Identifier) && !follows_member_access(&out) => {
                structure_at(nodes, index, token, &out, parent)?
            }
            _ => None,
        };

        match structured {
            Some((node, used)) => {
                out.push(node);
                index += used;
            }
            None => {
                out.push(nodes[index].clone());
                index += 1;
            }
        }
    }

    Ok(out)
}

/// Refine the children of a group
pub fn refine_group(group: &Group) -> Result<Group, RawError> {
    Ok(group.with_children(refine(&group.children, Some(group.delimiter))?))
}

fn follows_member_access(out: &[Node]) -> bool {
    matches!(
        out.last(),
        Some(Node::Token(token)) if matches!(token.kind, TokenKind::Dot | TokenKind::QuestionDot)
    )
}

fn structure_at(
    nodes: &[Node],
    index: usize,
    token: &SyntaxToken,
    out: &[Node],
    parent: Option<Delimiter>,
) -> Result<Option<(Node, usize)>, RawError> {
    match token.text.as_str() {
        "class" => class_at(nodes, index, out, parent),
        "for" => for_of_at(nodes, index),
        "await" => await_at(nodes, index),
        _ => Ok(type_reference_at(nodes, index).or_else(|| property_access_at(nodes, index))),
    }
}

fn class_at(
    nodes: &[Node],
    index: usize,
    out: &[Node],
    parent: Option<Delimiter>,
) -> Result<Option<(Node, usize)>, RawError> {
    let Some(keyword) = nodes[index].as_token() else {
        return Ok(None);
    };

    let mut position = index + 1;
    let name = match nodes.get(position) {
        Some(Node::Token(token))
            if token.is(TokenKind::Identifier)
                && !token.is_word("extends")
                && !token.is_word("implements") =>
        {
            position += 1;
            Some(token.clone())
        }
        Some(Node::Token(token)) if !token.is(TokenKind::LessThan) && !token.is(TokenKind::Identifier) => {
            return Ok(None)
        }
        None => return Ok(None),
        _ => None,
    };

    let heritage_start = position;
    let mut angle_depth = 0usize;
    let body = loop {
        match nodes.get(position) {
            None => return Ok(None),
            Some(Node::Group(group)) if group.delimiter == Delimiter::Brace && angle_depth == 0 => {
                break group;
            }
            Some(Node::Token(token)) => match token.kind {
                TokenKind::LessThan => angle_depth += 1,
                TokenKind::GreaterThan => angle_depth = angle_depth.saturating_sub(1),
                TokenKind::Semicolon | TokenKind::Equals | TokenKind::Comma if angle_depth == 0 => {
                    return Ok(None)
                }
                _ => {}
            },
            Some(_) => {}
        }
        position += 1;
    };

    let class = ClassDecl {
        keyword: keyword.clone(),
        name,
        heritage: refine(&nodes[heritage_start..position], parent)?,
        body: members::parse_class_body(body)?,
        is_expression: is_expression_position(out, parent),
    };
    Ok(Some((Node::Class(class), position + 1 - index)))
}

/// Check if a `class` keyword after `out` starts an expression rather than a declaration
fn is_expression_position(out: &[Node], parent: Option<Delimiter>) -> bool {
    match out.last() {
        None => matches!(
            parent,
            Some(Delimiter::Paren) | Some(Delimiter::Bracket) | Some(Delimiter::Template)
        ),
        Some(Node::Token(token)) => {
            matches!(
                token.kind,
                TokenKind::Equals
                    | TokenKind::Comma
                    | TokenKind::Colon
                    | TokenKind::Question
                    | TokenKind::Arrow
                    | TokenKind::Operator
                    | TokenKind::Bang
                    | TokenKind::Pipe
                    | TokenKind::Ampersand
                    | TokenKind::TemplateMiddle
            ) || ["return", "yield", "new", "typeof", "void", "await"]
                .iter()
                .any(|word| token.is_word(word))
        }
        Some(_) => false,
    }
}

fn for_of_at(nodes: &[Node], index: usize) -> Result<Option<(Node, usize)>, RawError> {
    let Some(for_keyword) = nodes[index].as_token() else {
        return Ok(None);
    };

    let mut position = index + 1;
    let await_keyword = match nodes.get(position) {
        Some(Node::Token(token)) if token.is_word("await") => {
            position += 1;
            Some(token.clone())
        }
        _ => None,
    };

    let head = match nodes.get(position) {
        Some(Node::Group(group)) if group.delimiter == Delimiter::Paren => group,
        _ => return Ok(None),
    };
    if await_keyword.is_none() && !head.children.iter().any(|node| node.is_word("of")) {
        return Ok(None);
    }

    let for_of = ForOf {
        for_keyword: for_keyword.clone(),
        await_keyword,
        head: refine_group(head)?,
    };
    Ok(Some((Node::ForOf(for_of), position + 1 - index)))
}

fn await_at(nodes: &[Node], index: usize) -> Result<Option<(Node, usize)>, RawError> {
    let Some(keyword) = nodes[index].as_token() else {
        return Ok(None);
    };

    let end = operand_end(nodes, index + 1);
    if end == index + 1 {
        return Ok(None);
    }

    let await_expr = AwaitExpr {
        keyword: keyword.clone(),
        operand: refine(&nodes[index + 1..end], None)?,
    };
    Ok(Some((Node::Await(await_expr), end - index)))
}

/// End (exclusive) of the unary expression starting at `start`, or `start` if there is none
pub fn operand_end(nodes: &[Node], start: usize) -> usize {
    let mut position = start;

    while let Some(Node::Token(token)) = nodes.get(position) {
        if is_prefix_operator(token) {
            position += 1;
        } else {
            break;
        }
    }

    match nodes.get(position) {
        Some(Node::Group(_)) => position += 1,
        Some(Node::Token(token)) if is_primary(token) => position += 1,
        _ => return start,
    }

    loop {
        match nodes.get(position) {
            Some(Node::Token(token)) if matches!(token.kind, TokenKind::Dot | TokenKind::QuestionDot) => {
                match nodes.get(position + 1) {
                    Some(Node::Token(name))
                        if matches!(name.kind, TokenKind::Identifier | TokenKind::PrivateName) =>
                    {
                        position += 2
                    }
                    Some(Node::Group(group))
                        if token.is(TokenKind::QuestionDot) && group.delimiter != Delimiter::Brace =>
                    {
                        position += 2
                    }
                    _ => break,
                }
            }
            Some(Node::Group(group)) if group.delimiter != Delimiter::Brace && !group.open.starts_line() => {
                position += 1
            }
            Some(Node::Token(token)) if token.is(TokenKind::Template) && token.leading.is_empty() => {
                position += 1
            }
            Some(Node::Token(token)) if token.is(TokenKind::Bang) && token.leading.is_empty() => position += 1,
            Some(Node::Token(token)) if token.is(TokenKind::LessThan) && token.leading.is_empty() => {
                match generic_call_arguments(nodes, position) {
                    Some(length) => position += length,
                    None => break,
                }
            }
            _ => break,
        }
    }

    position
}

fn is_prefix_operator(token: &SyntaxToken) -> bool {
    match token.kind {
        TokenKind::Bang => true,
        TokenKind::Operator => matches!(token.text.as_str(), "-" | "+" | "~" | "++" | "--"),
        TokenKind::Identifier => PREFIX_WORDS.contains(&token.text.as_str()),
        _ => false,
    }
}

fn is_primary(token: &SyntaxToken) -> bool {
    match token.kind {
        TokenKind::Identifier => !OPERATOR_WORDS.contains(&token.text.as_str()),
        TokenKind::PrivateName => true,
        kind => kind.is_literal(),
    }
}

/// Length of `<Args>` at `position` when it is followed by a call
fn generic_call_arguments(nodes: &[Node], position: usize) -> Option<usize> {
    let mut cursor = Cursor::new(&nodes[position..]);
    types::parse_type_arguments(&mut cursor).ok()?;
    match cursor.peek() {
        Some(Node::Group(group)) if group.delimiter == Delimiter::Paren => Some(cursor.pos()),
        _ => None,
    }
}

/// `Name<Args>` written in expression or heritage position
fn type_reference_at(nodes: &[Node], index: usize) -> Option<(Node, usize)> {
    match nodes.get(index + 1) {
        Some(Node::Token(token)) if token.is(TokenKind::LessThan) && token.leading.is_empty() => {}
        _ => return None,
    }

    let mut cursor = Cursor::new(&nodes[index..]);
    let type_ref = types::parse_type_reference(&mut cursor).ok()?;
    type_ref.arguments.as_ref()?;

    let follows_type = match cursor.peek() {
        None | Some(Node::Group(_)) => true,
        Some(Node::Token(token)) => {
            token.starts_line()
                || matches!(
                    token.kind,
                    TokenKind::Comma
                        | TokenKind::Semicolon
                        | TokenKind::Equals
                        | TokenKind::Pipe
                        | TokenKind::Ampersand
                        | TokenKind::GreaterThan
                        | TokenKind::Arrow
                        | TokenKind::Question
                        | TokenKind::Colon
                        | TokenKind::TemplateMiddle
                )
                || ["implements", "extends", "as", "satisfies"]
                    .iter()
                    .any(|word| token.is_word(word))
        }
        Some(_) => false,
    };

    follows_type.then(|| (Node::TypeRef(type_ref), cursor.pos()))
}

fn property_access_at(nodes: &[Node], index: usize) -> Option<(Node, usize)> {
    match (nodes.get(index), nodes.get(index + 1), nodes.get(index + 2)) {
        (Some(Node::Token(object)), Some(Node::Token(dot)), Some(Node::Token(name)))
            if object.is(TokenKind::Identifier)
                && dot.is(TokenKind::Dot)
                && matches!(name.kind, TokenKind::Identifier | TokenKind::PrivateName) =>
        {
            let access = PropertyAccess {
                object: object.clone(),
                dot: dot.clone(),
                name: name.clone(),
            };
            Some((Node::PropertyAccess(access), 3))
        }
        _ => None,
    }
}
