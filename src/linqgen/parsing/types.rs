//! Type parsing
//!
//!     Parses types in annotations: parameter types and return types. The grammar covered
//!     is the part of TypeScript's type syntax that shows up in method signatures:
//!
//!         type       := ['|' | '&'] operand (('|' | '&') operand)* [conditional]
//!         conditional:= 'extends' operand '?' type ':' type
//!         operand    := primary ('[' ... ']')*
//!         primary    := reference | keyword type | literal | '(' type ')'
//!                     | '(' params ')' '=>' type | '{' ... '}' | '[' ... ']'
//!                     | ('keyof' | 'readonly' | 'unique') operand | 'typeof' name
//!
//!     Object and tuple types are refined like any other group, which still turns the
//!     references inside them into [TypeRef] nodes.
//!
//!     Keyword types (`void`, `number`...) are kept as plain tokens: they are not references
//!     to a declared type.

use super::cursor::Cursor;
use super::refine::{refine, refine_group};
use super::{ParseErrorKind, RawError};
use crate::linqgen::ast::{Delimiter, Node, TypeArgument, TypeArguments, TypeNode, TypeRef};
use crate::linqgen::token::TokenKind;

const KEYWORD_TYPES: &[&str] = &[
    "any", "unknown", "never", "void", "undefined", "null", "string", "number", "boolean", "bigint",
    "symbol", "object", "true", "false",
];

/// Parse a type at the cursor
pub fn parse_type(cursor: &mut Cursor) -> Result<TypeNode, RawError> {
    let mut nodes = Vec::new();
    parse_union(cursor, &mut nodes, true)?;
    Ok(TypeNode { nodes })
}

fn push_next(cursor: &mut Cursor, out: &mut Vec<Node>) {
    if let Some(node) = cursor.bump() {
        out.push(node.clone());
    }
}

fn at_union_operator(cursor: &Cursor) -> bool {
    cursor.at_kind(TokenKind::Pipe) || cursor.at_kind(TokenKind::Ampersand)
}

fn parse_union(cursor: &mut Cursor, out: &mut Vec<Node>, allow_conditional: bool) -> Result<(), RawError> {
    if at_union_operator(cursor) {
        push_next(cursor, out);
    }

    loop {
        parse_operand(cursor, out)?;

        if allow_conditional && cursor.at_word("extends") {
            push_next(cursor, out);
            parse_union(cursor, out, false)?;
            out.push(Node::Token(cursor.expect_kind(TokenKind::Question, "a conditional type")?));
            parse_union(cursor, out, true)?;
            out.push(Node::Token(cursor.expect_kind(TokenKind::Colon, "a conditional type")?));
            return parse_union(cursor, out, true);
        }

        if at_union_operator(cursor) {
            push_next(cursor, out);
        } else {
            return Ok(());
        }
    }
}

fn parse_operand(cursor: &mut Cursor, out: &mut Vec<Node>) -> Result<(), RawError> {
    parse_primary(cursor, out)?;
    while let Some(group) = cursor.peek_group(Delimiter::Bracket) {
        if group.open.starts_line() {
            break;
        }
        cursor.bump();
        out.push(Node::Group(refine_group(group)?));
    }
    Ok(())
}

fn parse_primary(cursor: &mut Cursor, out: &mut Vec<Node>) -> Result<(), RawError> {
    let Some(node) = cursor.peek() else {
        return Err(cursor.unexpected("a type"));
    };

    match node {
        Node::Token(token) => match token.kind {
            TokenKind::Identifier => match token.text.as_str() {
                "keyof" | "readonly" | "unique" => {
                    push_next(cursor, out);
                    parse_operand(cursor, out)
                }
                "new" | "abstract" | "asserts" => {
                    push_next(cursor, out);
                    parse_primary(cursor, out)
                }
                "infer" => {
                    push_next(cursor, out);
                    out.push(Node::Token(cursor.expect_kind(TokenKind::Identifier, "a type")?));
                    Ok(())
                }
                "typeof" => {
                    push_next(cursor, out);
                    out.push(Node::Token(cursor.expect_kind(TokenKind::Identifier, "a type")?));
                    while cursor.at_kind(TokenKind::Dot) {
                        push_next(cursor, out);
                        out.push(Node::Token(cursor.expect_kind(TokenKind::Identifier, "a type")?));
                    }
                    Ok(())
                }
                text if KEYWORD_TYPES.contains(&text) => {
                    push_next(cursor, out);
                    Ok(())
                }
                _ => {
                    let type_ref = parse_type_reference(cursor)?;
                    out.push(Node::TypeRef(type_ref));
                    // type predicate: `x is T`
                    if cursor.at_word("is") {
                        push_next(cursor, out);
                        parse_union(cursor, out, true)?;
                    }
                    Ok(())
                }
            },
            TokenKind::String | TokenKind::Number | TokenKind::Template => {
                push_next(cursor, out);
                Ok(())
            }
            TokenKind::Operator if token.text == "-" => {
                push_next(cursor, out);
                out.push(Node::Token(cursor.expect_kind(TokenKind::Number, "a type")?));
                Ok(())
            }
            TokenKind::LessThan => {
                // generic function type: `<T>(x: T) => U`
                out.extend(type_parameters(cursor)?);
                parse_primary(cursor, out)
            }
            _ => Err(cursor.unexpected("a type")),
        },
        Node::Group(group) => {
            cursor.bump();
            match group.delimiter {
                Delimiter::Paren if cursor.at_kind(TokenKind::Arrow) => {
                    out.push(Node::Group(refine_group(group)?));
                    push_next(cursor, out);
                    parse_union(cursor, out, true)
                }
                Delimiter::Paren => {
                    let mut inner = Cursor::in_group(group);
                    let ty = parse_type(&mut inner)?;
                    if !inner.is_at_end() {
                        return Err(inner.unexpected("a parenthesized type"));
                    }
                    out.push(Node::Group(group.with_children(ty.nodes)));
                    Ok(())
                }
                Delimiter::Brace | Delimiter::Bracket | Delimiter::Template => {
                    out.push(Node::Group(refine_group(group)?));
                    Ok(())
                }
            }
        }
        _ => Err(cursor.unexpected("a type")),
    }
}

/// Parse `Name`, `Qualified.Name` or either with a type argument list
pub fn parse_type_reference(cursor: &mut Cursor) -> Result<TypeRef, RawError> {
    let first = cursor.expect_kind(TokenKind::Identifier, "a type")?;
    let mut name = vec![first];

    while cursor.at_kind(TokenKind::Dot)
        && matches!(cursor.peek_nth(1), Some(Node::Token(token)) if token.is(TokenKind::Identifier))
    {
        name.push(cursor.expect_kind(TokenKind::Dot, "a type")?);
        name.push(cursor.expect_kind(TokenKind::Identifier, "a type")?);
    }

    let arguments = if cursor.at_kind(TokenKind::LessThan) {
        Some(parse_type_arguments(cursor)?)
    } else {
        None
    };

    Ok(TypeRef { name, arguments })
}

/// Parse `<A, B>`
pub fn parse_type_arguments(cursor: &mut Cursor) -> Result<TypeArguments, RawError> {
    let open = cursor.expect_kind(TokenKind::LessThan, "a type argument list")?;
    let mut arguments = Vec::new();

    while !cursor.at_kind(TokenKind::GreaterThan) {
        let ty = parse_type(cursor)?;
        let comma = cursor.eat_kind(TokenKind::Comma);
        let last = comma.is_none();
        arguments.push(TypeArgument { nodes: ty.nodes, comma });
        if last {
            break;
        }
    }

    let close = cursor.expect_kind(TokenKind::GreaterThan, "a type argument list")?;
    Ok(TypeArguments {
        open,
        arguments,
        close,
    })
}

/// Consume a `<...>` type parameter list, returning it as refined nodes
pub fn type_parameters(cursor: &mut Cursor) -> Result<Vec<Node>, RawError> {
    let start = cursor.pos();
    let open_offset = cursor.offset();
    cursor.expect_kind(TokenKind::LessThan, "a type parameter list")?;

    let mut depth = 1usize;
    while depth > 0 {
        match cursor.bump() {
            None => {
                return Err(RawError::new(
                    ParseErrorKind::Unclosed { open: "<".into() },
                    open_offset,
                ))
            }
            Some(node) if node.is_token(TokenKind::LessThan) => depth += 1,
            Some(node) if node.is_token(TokenKind::GreaterThan) => depth -= 1,
            Some(_) => {}
        }
    }

    refine(cursor.since(start), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linqgen::lexing::tokenize;
    use crate::linqgen::parsing::token_tree;

    fn parse(source: &str) -> Result<(TypeNode, usize, usize), RawError> {
        let tree = token_tree::build(tokenize(source).tokens).unwrap();
        let mut cursor = Cursor::new(&tree);
        let ty = parse_type(&mut cursor)?;
        Ok((ty, cursor.pos(), tree.len()))
    }

    fn parses_fully(source: &str) -> TypeNode {
        let (ty, pos, len) = parse(source).unwrap();
        assert_eq!(pos, len, "type `{}` was not fully consumed", source);
        ty
    }

    #[test]
    fn test_reference_with_arguments() {
        let ty = parses_fully("Map<K, Array<V>>");
        let type_ref = ty.as_reference().unwrap();
        assert_eq!(type_ref.argument_count(), 2);
    }

    #[test]
    fn test_qualified_reference() {
        let ty = parses_fully("ns.Thing<T>");
        assert!(ty.as_reference().unwrap().is_qualified());
    }

    #[test]
    fn test_keyword_types_are_not_references() {
        let ty = parses_fully("void");
        assert!(ty.as_reference().is_none());
        assert!(ty.nodes[0].is_word("void"));
    }

    #[test]
    fn test_function_type() {
        let ty = parses_fully("(accumulate: TAccumulate, element: T) => AsyncOrSync<TAccumulate>");
        assert!(ty.nodes[0].is_group(Delimiter::Paren));
        assert!(ty.nodes[1].is_token(TokenKind::Arrow));
        assert!(matches!(&ty.nodes[2], Node::TypeRef(r) if r.name_text() == "AsyncOrSync"));
    }

    #[test]
    fn test_function_type_parameters_are_refined() {
        let ty = parses_fully("(element: AsyncOrSync<T>) => void");
        let group = ty.nodes[0].as_group().unwrap();
        assert!(group.children.iter().any(|node| matches!(node, Node::TypeRef(_))));
    }

    #[test]
    fn test_union_array_and_conditional() {
        parses_fully("string | T[] | undefined");
        parses_fully("T extends number ? void : never");
        parses_fully("keyof T");
        parses_fully("{ key: K; value: AsyncOrSync<V> }");
        parses_fully("[T, U]");
        parses_fully("'a' | -1");
    }

    #[test]
    fn test_type_stops_before_body() {
        let (ty, pos, len) = parse("Promise<T> { return x; }").unwrap();
        assert!(ty.as_reference().is_some());
        assert_eq!(pos, 4);
        assert_eq!(len, 5);
    }

    #[test]
    fn test_unclosed_arguments() {
        assert!(parse("Promise<T").is_err());
        assert!(parse(": T").is_err());
    }

    #[test]
    fn test_type_parameters() {
        let tree = token_tree::build(tokenize("<K, R = Grouping<K, T>>(x)").tokens).unwrap();
        let mut cursor = Cursor::new(&tree);
        let nodes = type_parameters(&mut cursor).unwrap();
        assert!(nodes.iter().any(|node| matches!(node, Node::TypeRef(r) if r.name_text() == "Grouping")));
        assert!(cursor.peek_group(Delimiter::Paren).is_some());
    }
}
