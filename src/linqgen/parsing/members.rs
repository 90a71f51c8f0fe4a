//! Class body parsing
//!
//!     A class body is read member by member:
//!
//!         member := ';'
//!                 | decorator* modifier* ['get' | 'set'] ['*'] name ['?' | '!']
//!                   [type-parameters] ( parameters [':' type] [body | ';'] | property )
//!
//!     A word is only taken as a modifier (or as `get`/`set`) when another member name
//!     follows it, so `public async()` is a method named `async`. Constructors and `set`
//!     accessors are parsed for their extent and kept as opaque members.
//!
//!     Properties and index signatures have no explicit end in TypeScript. A property ends
//!     at a `;`, or at a line break that cannot continue the expression it belongs to.

use super::cursor::Cursor;
use super::refine::{refine, refine_group};
use super::{types, RawError};
use crate::linqgen::ast::{
    AccessorDecl, Binding, ClassBody, Decorator, Delimiter, Group, Initializer, Member, MethodDecl,
    Node, Parameter, ParameterList, PropertyName, TypeAnnotation,
};
use crate::linqgen::token::TokenKind;

const MEMBER_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "static",
    "readonly",
    "abstract",
    "async",
    "override",
    "declare",
    "accessor",
];

const PARAMETER_MODIFIERS: &[&str] = &["public", "private", "protected", "readonly", "override"];

/// Parse the members of a class body group
pub fn parse_class_body(group: &Group) -> Result<ClassBody, RawError> {
    let mut cursor = Cursor::in_group(group);
    let mut members = Vec::new();
    while !cursor.is_at_end() {
        members.push(parse_member(&mut cursor)?);
    }

    Ok(ClassBody {
        open: group.open.clone(),
        members,
        close: group.close.clone(),
    })
}

/// Check if `node` can start a member name
fn names_member(node: Option<&Node>) -> bool {
    match node {
        Some(Node::Token(token)) => matches!(
            token.kind,
            TokenKind::Identifier
                | TokenKind::String
                | TokenKind::Number
                | TokenKind::PrivateName
                | TokenKind::Asterisk
        ),
        Some(Node::Group(group)) => group.delimiter == Delimiter::Bracket,
        _ => false,
    }
}

fn parse_member(cursor: &mut Cursor) -> Result<Member, RawError> {
    let start = cursor.pos();
    if cursor.eat_kind(TokenKind::Semicolon).is_some() {
        return Ok(Member::Other(cursor.since(start).to_vec()));
    }

    let mut decorators = Vec::new();
    while cursor.at_kind(TokenKind::At) {
        decorators.push(parse_decorator(cursor)?);
    }

    let mut modifiers = Vec::new();
    while let Some(token) = cursor.peek_token() {
        if token.is(TokenKind::Identifier)
            && MEMBER_MODIFIERS.contains(&token.text.as_str())
            && names_member(cursor.peek_nth(1))
        {
            modifiers.push(token.clone());
            cursor.bump();
        } else {
            break;
        }
    }

    let accessor = match cursor.peek_token() {
        Some(token) if (token.is_word("get") || token.is_word("set")) && names_member(cursor.peek_nth(1)) => {
            cursor.bump();
            Some(token.clone())
        }
        _ => None,
    };

    let asterisk = cursor.eat_kind(TokenKind::Asterisk);
    let name = parse_property_name(cursor)?;
    let question = cursor
        .eat_kind(TokenKind::Question)
        .or_else(|| cursor.eat_kind(TokenKind::Bang));
    let type_parameters = if cursor.at_kind(TokenKind::LessThan) {
        types::type_parameters(cursor)?
    } else {
        Vec::new()
    };

    let Some(parameter_group) = cursor.peek_group(Delimiter::Paren) else {
        skip_property(cursor, start);
        return Ok(Member::Other(refine(cursor.since(start), Some(Delimiter::Brace))?));
    };
    cursor.bump();

    let parameters = parse_parameter_list(parameter_group)?;
    let return_type = match cursor.eat_kind(TokenKind::Colon) {
        Some(colon) => Some(TypeAnnotation {
            colon,
            ty: types::parse_type(cursor)?,
        }),
        None => None,
    };
    let body = match cursor.peek_group(Delimiter::Brace) {
        Some(body) => {
            cursor.bump();
            Some(refine_group(body)?)
        }
        None => None,
    };
    let terminator = if body.is_none() {
        cursor.eat_kind(TokenKind::Semicolon)
    } else {
        None
    };

    let is_constructor = name.identifier() == Some("constructor");
    match accessor {
        Some(keyword) if keyword.is_word("get") && !is_constructor => {
            let mut getter = AccessorDecl {
                leading: String::new(),
                decorators,
                modifiers,
                get_keyword: keyword,
                name,
                parameters,
                return_type,
                body,
                terminator,
            };
            getter.leading = std::mem::take(&mut getter.first_token_mut().leading);
            Ok(Member::Getter(getter))
        }
        None if !is_constructor => {
            let mut method = MethodDecl {
                leading: String::new(),
                decorators,
                modifiers,
                asterisk,
                name,
                question,
                type_parameters,
                parameters,
                return_type,
                body,
                terminator,
            };
            method.leading = std::mem::take(&mut method.first_token_mut().leading);
            Ok(Member::Method(method))
        }
        _ => Ok(Member::Other(refine(cursor.since(start), Some(Delimiter::Brace))?)),
    }
}

fn parse_decorator(cursor: &mut Cursor) -> Result<Decorator, RawError> {
    let at = cursor.expect_kind(TokenKind::At, "a decorator")?;
    let start = cursor.pos();
    cursor.expect_kind(TokenKind::Identifier, "a decorator")?;

    loop {
        if cursor.at_kind(TokenKind::Dot)
            && matches!(cursor.peek_nth(1), Some(Node::Token(token)) if token.is(TokenKind::Identifier))
        {
            cursor.bump();
            cursor.bump();
            continue;
        }
        match cursor.peek_group(Delimiter::Paren) {
            Some(group) if !group.open.starts_line() => {
                cursor.bump();
            }
            _ => break,
        }
    }

    Ok(Decorator {
        at,
        expression: refine(cursor.since(start), None)?,
    })
}

fn parse_property_name(cursor: &mut Cursor) -> Result<PropertyName, RawError> {
    let name = match cursor.peek() {
        Some(Node::Token(token)) if token.is(TokenKind::Identifier) => PropertyName::Identifier(token.clone()),
        Some(Node::Token(token))
            if matches!(token.kind, TokenKind::String | TokenKind::Number | TokenKind::PrivateName) =>
        {
            PropertyName::Literal(token.clone())
        }
        Some(Node::Group(group)) if group.delimiter == Delimiter::Bracket => {
            PropertyName::Computed(refine_group(group)?)
        }
        _ => return Err(cursor.unexpected("a class body")),
    };
    cursor.bump();
    Ok(name)
}

/// Skip the rest of a property declaration that started at `start`
fn skip_property(cursor: &mut Cursor, start: usize) {
    let mut previous = cursor.since(start).last();
    while let Some(node) = cursor.peek() {
        if node.is_token(TokenKind::Semicolon) {
            cursor.bump();
            return;
        }
        if let Some(previous) = previous {
            if node.first_token().starts_line() && !continues_expression(previous, node) {
                return;
            }
        }
        cursor.bump();
        previous = Some(node);
    }
}

fn continues_expression(previous: &Node, next: &Node) -> bool {
    let ends_incomplete = matches!(
        previous,
        Node::Token(token) if matches!(
            token.kind,
            TokenKind::Equals
                | TokenKind::Arrow
                | TokenKind::Colon
                | TokenKind::Comma
                | TokenKind::Pipe
                | TokenKind::Ampersand
                | TokenKind::Operator
                | TokenKind::Dot
                | TokenKind::QuestionDot
                | TokenKind::Question
                | TokenKind::LessThan
        )
    );
    let starts_continuation = matches!(
        next,
        Node::Token(token) if matches!(
            token.kind,
            TokenKind::Arrow
                | TokenKind::Pipe
                | TokenKind::Ampersand
                | TokenKind::Operator
                | TokenKind::Dot
                | TokenKind::QuestionDot
                | TokenKind::Question
                | TokenKind::Colon
        )
    );
    ends_incomplete || starts_continuation
}

/// Parse the parameters inside a `(...)` group
pub fn parse_parameter_list(group: &Group) -> Result<ParameterList, RawError> {
    let mut cursor = Cursor::in_group(group);
    let mut parameters = Vec::new();
    while !cursor.is_at_end() {
        parameters.push(parse_parameter(&mut cursor)?);
    }

    Ok(ParameterList {
        open: group.open.clone(),
        parameters,
        close: group.close.clone(),
    })
}

fn parse_parameter(cursor: &mut Cursor) -> Result<Parameter, RawError> {
    let mut modifiers = Vec::new();
    while let Some(token) = cursor.peek_token() {
        let binding_follows = match cursor.peek_nth(1) {
            Some(Node::Token(next)) => matches!(next.kind, TokenKind::Identifier | TokenKind::Ellipsis),
            Some(Node::Group(group)) => group.delimiter != Delimiter::Paren,
            _ => false,
        };
        if token.is(TokenKind::Identifier) && PARAMETER_MODIFIERS.contains(&token.text.as_str()) && binding_follows {
            modifiers.push(token.clone());
            cursor.bump();
        } else {
            break;
        }
    }

    let rest = cursor.eat_kind(TokenKind::Ellipsis);
    let binding = match cursor.peek() {
        Some(Node::Token(token)) if token.is(TokenKind::Identifier) => Binding::Identifier(token.clone()),
        Some(Node::Group(group)) if group.delimiter != Delimiter::Paren => Binding::Pattern(refine_group(group)?),
        _ => return Err(cursor.unexpected("a parameter list")),
    };
    cursor.bump();

    let question = cursor.eat_kind(TokenKind::Question);
    let annotation = match cursor.eat_kind(TokenKind::Colon) {
        Some(colon) => Some(TypeAnnotation {
            colon,
            ty: types::parse_type(cursor)?,
        }),
        None => None,
    };
    let initializer = match cursor.eat_kind(TokenKind::Equals) {
        Some(equals) => {
            let start = cursor.pos();
            skip_argument(cursor);
            Some(Initializer {
                equals,
                value: refine(cursor.since(start), Some(Delimiter::Paren))?,
            })
        }
        None => None,
    };

    let comma = cursor.eat_kind(TokenKind::Comma);
    if comma.is_none() && !cursor.is_at_end() {
        return Err(cursor.unexpected("a parameter list"));
    }

    Ok(Parameter {
        modifiers,
        rest,
        binding,
        question,
        annotation,
        initializer,
        comma,
    })
}

/// Skip an expression up to the next top-level comma
fn skip_argument(cursor: &mut Cursor) {
    let mut angle_depth = 0usize;
    let mut after_identifier = false;
    while let Some(node) = cursor.peek() {
        match node {
            Node::Token(token) if token.is(TokenKind::Comma) && angle_depth == 0 => return,
            Node::Token(token) if token.is(TokenKind::LessThan) && after_identifier && token.leading.is_empty() => {
                angle_depth += 1
            }
            Node::Token(token) if token.is(TokenKind::GreaterThan) && angle_depth > 0 => angle_depth -= 1,
            _ => {}
        }
        after_identifier = node.is_token(TokenKind::Identifier);
        cursor.bump();
    }
}
