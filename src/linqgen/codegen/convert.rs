//! Asynchronous to synchronous conversion
//!
//!     The conversions are purely syntactic and walk the refined tree:
//!
//!     - `await expr` becomes `expr`, and `for await (...)` becomes `for (...)`.
//!     - `Symbol.asyncIterator` becomes `Symbol.iterator`.
//!     - Renamed identifiers (`AsyncIterable` to `Iterable` and so on) are replaced wherever
//!       they appear.
//!     - Unwrapped type references (`AsyncOrSync<X>`) are replaced by their first type
//!       argument.
//!
//!     The trivia in front of a dropped keyword or type name moves onto whatever takes its
//!     place, so the output keeps the layout of the template.

use super::CodegenError;
use crate::linqgen::ast::{
    inherit_leading, ForOf, Group, Node, ParameterList, PropertyAccess, PropertyName, TypeArgument,
    TypeArguments, TypeNode, TypeRef,
};
use crate::linqgen::config::{ReturnConversion, TypeMapping};
use crate::linqgen::token::{inherit_trivia, SyntaxToken, TokenKind};

const ASYNC_ITERATOR_SYMBOL: (&str, &str) = ("Symbol", "asyncIterator");
const SYNC_ITERATOR_NAME: &str = "iterator";

/// Converts the pieces of one template member
pub struct SyncConverter<'a> {
    types: &'a TypeMapping,
    /// Printable name of the member, for error messages
    member: &'a str,
}

impl<'a> SyncConverter<'a> {
    pub fn new(types: &'a TypeMapping, member: &'a str) -> Self {
        Self { types, member }
    }

    pub fn nodes(&self, nodes: &[Node]) -> Result<Vec<Node>, CodegenError> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.convert_into(node, &mut out)?;
        }
        Ok(out)
    }

    pub fn body(&self, body: &Group) -> Result<Group, CodegenError> {
        Ok(body.with_children(self.nodes(&body.children)?))
    }

    pub fn parameters(&self, parameters: &ParameterList) -> Result<ParameterList, CodegenError> {
        parameters.try_map_nodes(&mut |nodes: &[Node]| self.nodes(nodes))
    }

    /// `[Symbol.asyncIterator]` names become `[Symbol.iterator]`
    pub fn name(&self, name: &PropertyName) -> Result<PropertyName, CodegenError> {
        match name {
            PropertyName::Computed(group) => Ok(PropertyName::Computed(self.body(group)?)),
            other => Ok(other.clone()),
        }
    }

    /// Convert a method's declared return type
    ///
    /// Only the return types listed in the mapping are accepted. An unwrapped return type
    /// (`Promise<T>`) is replaced by its argument as written; a renamed one keeps its
    /// arguments.
    pub fn return_type(&self, return_type: &TypeRef) -> Result<TypeNode, CodegenError> {
        let unknown = || CodegenError::UnknownReturnType {
            method: self.member.to_string(),
            identifier: return_type.name_text(),
        };
        let identifier = return_type.identifier().ok_or_else(unknown)?;

        match self.types.return_conversion(&identifier.text) {
            Some(ReturnConversion::Unwrap) => {
                let mut nodes = return_type
                    .arguments
                    .as_ref()
                    .and_then(TypeArguments::first)
                    .ok_or_else(|| self.missing_argument(&identifier.text))?
                    .to_vec();
                inherit_leading(&mut nodes, &identifier.leading);
                Ok(TypeNode { nodes })
            }
            Some(ReturnConversion::Rename(name)) => Ok(TypeNode::reference(TypeRef {
                name: vec![identifier.with_text(name.as_str())],
                arguments: return_type.arguments.clone(),
            })),
            None => Err(unknown()),
        }
    }

    fn missing_argument(&self, identifier: &str) -> CodegenError {
        CodegenError::MissingTypeArgument {
            method: self.member.to_string(),
            identifier: identifier.to_string(),
        }
    }

    fn rename(&self, token: &SyntaxToken) -> SyntaxToken {
        if !token.is(TokenKind::Identifier) {
            return token.clone();
        }
        match self.types.rename(&token.text) {
            Some(renamed) => token.with_text(renamed),
            None => token.clone(),
        }
    }

    fn convert_into(&self, node: &Node, out: &mut Vec<Node>) -> Result<(), CodegenError> {
        match node {
            Node::Token(token) => out.push(Node::Token(self.rename(token))),
            Node::Group(group) => out.push(Node::Group(self.body(group)?)),
            Node::Class(class) => {
                out.push(Node::Class(class.try_map_nodes(&mut |nodes: &[Node]| self.nodes(nodes))?))
            }
            Node::ForOf(for_of) => {
                let mut head = self.body(&for_of.head)?;
                if let Some(keyword) = &for_of.await_keyword {
                    head.open.leading = inherit_trivia(&keyword.leading, &head.open.leading);
                }
                out.push(Node::ForOf(ForOf {
                    for_keyword: for_of.for_keyword.clone(),
                    await_keyword: None,
                    head,
                }));
            }
            Node::Await(await_expr) => {
                let mut operand = self.nodes(&await_expr.operand)?;
                inherit_leading(&mut operand, &await_expr.keyword.leading);
                out.extend(operand);
            }
            Node::PropertyAccess(access) => {
                let (object, name) = ASYNC_ITERATOR_SYMBOL;
                let converted = if access.is(object, name) {
                    PropertyAccess {
                        name: access.name.with_text(SYNC_ITERATOR_NAME),
                        ..access.clone()
                    }
                } else {
                    PropertyAccess {
                        object: self.rename(&access.object),
                        ..access.clone()
                    }
                };
                out.push(Node::PropertyAccess(converted));
            }
            Node::TypeRef(type_ref) => out.extend(self.type_reference(type_ref)?),
        }
        Ok(())
    }

    fn type_reference(&self, type_ref: &TypeRef) -> Result<Vec<Node>, CodegenError> {
        if let Some(identifier) = type_ref.identifier() {
            if self.types.is_unwrapped(&identifier.text) {
                let mut nodes = self.nodes(
                    type_ref
                        .arguments
                        .as_ref()
                        .and_then(TypeArguments::first)
                        .ok_or_else(|| self.missing_argument(&identifier.text))?,
                )?;
                inherit_leading(&mut nodes, &identifier.leading);
                return Ok(nodes);
            }
        }

        let name = if type_ref.is_qualified() {
            type_ref.name.clone()
        } else {
            type_ref.name.iter().map(|token| self.rename(token)).collect()
        };
        let arguments = match &type_ref.arguments {
            Some(arguments) => Some(TypeArguments {
                open: arguments.open.clone(),
                arguments: arguments
                    .arguments
                    .iter()
                    .map(|argument| {
                        Ok(TypeArgument {
                            nodes: self.nodes(&argument.nodes)?,
                            comma: argument.comma.clone(),
                        })
                    })
                    .collect::<Result<_, CodegenError>>()?,
                close: arguments.close.clone(),
            }),
            None => None,
        };
        Ok(vec![Node::TypeRef(TypeRef { name, arguments })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linqgen::formats::ToSource;
    use crate::linqgen::parsing::{parse_source, parse_type};

    fn convert_source(source: &str) -> String {
        let file = parse_source("template.ts", source).unwrap();
        let types = TypeMapping::default();
        let converter = SyncConverter::new(&types, "test");
        let nodes = converter.nodes(&file.nodes).unwrap();
        file.with_nodes(nodes).to_source()
    }

    fn convert_return(source: &str) -> Result<String, CodegenError> {
        let ty = parse_type(source).unwrap();
        let types = TypeMapping::default();
        let converter = SyncConverter::new(&types, "test");
        converter
            .return_type(ty.as_reference().unwrap())
            .map(|converted| converted.to_source())
    }

    #[test]
    fn test_await_is_dropped() {
        assert_eq!(
            convert_source("if (!await predicate(element)) { return; }"),
            "if (!predicate(element)) { return; }"
        );
        assert_eq!(
            convert_source("const x = await   this.first();"),
            "const x = this.first();"
        );
    }

    #[test]
    fn test_for_await_becomes_for() {
        assert_eq!(
            convert_source("for await (const element of this) { yield element; }"),
            "for (const element of this) { yield element; }"
        );
        assert_eq!(
            convert_source("for (const element of this) {}"),
            "for (const element of this) {}"
        );
    }

    #[test]
    fn test_template_substitutions_are_converted() {
        assert_eq!(
            convert_source("const s = `n=${await this.count()} ${x as AsyncIterable<T>}`;"),
            "const s = `n=${this.count()} ${x as Iterable<T>}`;"
        );
        assert_eq!(
            convert_source("log(`${`${await a}`}!`, `await ${b}`);"),
            "log(`${`${a}`}!`, `await ${b}`);"
        );
    }

    #[test]
    fn test_comments_and_regex_literals_are_kept() {
        assert_eq!(
            convert_source("const re = /[(]await/g; /** doc */ await f();"),
            "const re = /[(]await/g; /** doc */ f();"
        );
    }

    #[test]
    fn test_symbol_async_iterator() {
        assert_eq!(
            convert_source("const it = iterable[Symbol.asyncIterator]();"),
            "const it = iterable[Symbol.iterator]();"
        );
    }

    #[test]
    fn test_type_renames_and_unwraps() {
        assert_eq!(
            convert_source("let a: AsyncIterable<AsyncOrSync<boolean>>;"),
            "let a: Iterable<boolean>;"
        );
        assert_eq!(
            convert_source("function f(s: AsyncOrSyncIterable<T>): void {}"),
            "function f(s: Iterable<T>): void {}"
        );
        assert_eq!(
            convert_source("const m = new Map<K, AsyncOrSync<V>>();"),
            "const m = new Map<K, V>();"
        );
    }

    #[test]
    fn test_unwrap_without_argument_fails() {
        let file = parse_source("template.ts", "let a: AsyncOrSync<>;").unwrap();
        let types = TypeMapping::default();
        let converter = SyncConverter::new(&types, "where");
        assert_eq!(
            converter.nodes(&file.nodes),
            Err(CodegenError::MissingTypeArgument {
                method: "where".into(),
                identifier: "AsyncOrSync".into()
            })
        );
    }

    #[test]
    fn test_nested_class_bodies_are_converted() {
        assert_eq!(
            convert_source("const c = class { async m() { await x; } };"),
            "const c = class { async m() { x; } };"
        );
    }

    #[test]
    fn test_return_types() {
        assert_eq!(convert_return("Promise<number>").unwrap(), "number");
        assert_eq!(convert_return("Promise<AsyncOrSync<T>>").unwrap(), "AsyncOrSync<T>");
        assert_eq!(convert_return("AsyncIterable<T>").unwrap(), "Iterable<T>");
        assert_eq!(convert_return("AsyncIterator<T>").unwrap(), "Iterator<T>");
        assert_eq!(
            convert_return("AsyncSortedEnumerable<T>").unwrap(),
            "SortedEnumerable<T>"
        );
        assert_eq!(
            convert_return("Promise"),
            Err(CodegenError::MissingTypeArgument {
                method: "test".into(),
                identifier: "Promise".into()
            })
        );
        assert_eq!(
            convert_return("Bar<T>"),
            Err(CodegenError::UnknownReturnType {
                method: "test".into(),
                identifier: "Bar".into()
            })
        );
    }
}
