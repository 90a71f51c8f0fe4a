//! Type syntax
//!
//!     The generator only cares about one type shape: a reference to a named type with an
//!     optional argument list, such as `Promise<T>` or `AsyncIterable<Grouping<K, T>>`. Such
//!     references become [TypeRef] nodes wherever they appear. Every other type form (unions,
//!     function types, object literal types...) is kept as the plain nodes it was written
//!     with, so a [TypeNode] is simply a node sequence.

use super::nodes::Node;
use crate::linqgen::token::{SyntaxToken, TokenKind};

/// A reference to a named type
///
/// `name` holds the identifier tokens and the dots of a qualified name (`Foo.Bar`), so a
/// simple reference always has exactly one token there.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: Vec<SyntaxToken>,
    pub arguments: Option<TypeArguments>,
}

impl TypeRef {
    /// A reference to `name` with the given arguments
    pub fn simple(name: &str, leading: &str, arguments: Option<TypeArguments>) -> Self {
        Self {
            name: vec![SyntaxToken::identifier(name, leading)],
            arguments,
        }
    }

    /// The identifier of a simple (unqualified) reference
    pub fn identifier(&self) -> Option<&SyntaxToken> {
        match self.name.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.name.len() > 1
    }

    /// The name as written, without trivia
    pub fn name_text(&self) -> String {
        self.name.iter().map(|token| token.text.as_str()).collect()
    }

    /// Number of type arguments, 0 when there is no argument list
    pub fn argument_count(&self) -> usize {
        self.arguments
            .as_ref()
            .map(|arguments| arguments.arguments.len())
            .unwrap_or(0)
    }

    pub fn first_token(&self) -> &SyntaxToken {
        // A parsed reference always has a name; synthetic ones are built through `simple`
        &self.name[0]
    }

    pub fn first_token_mut(&mut self) -> &mut SyntaxToken {
        &mut self.name[0]
    }
}

/// `<A, B>`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeArguments {
    pub open: SyntaxToken,
    pub arguments: Vec<TypeArgument>,
    pub close: SyntaxToken,
}

impl TypeArguments {
    /// The first argument's nodes
    pub fn first(&self) -> Option<&[Node]> {
        self.arguments
            .first()
            .map(|argument| argument.nodes.as_slice())
    }
}

/// One entry of a type argument list, with its separating comma
#[derive(Debug, Clone, PartialEq)]
pub struct TypeArgument {
    pub nodes: Vec<Node>,
    pub comma: Option<SyntaxToken>,
}

/// A type written in an annotation
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub nodes: Vec<Node>,
}

impl TypeNode {
    pub fn reference(type_ref: TypeRef) -> Self {
        Self {
            nodes: vec![Node::TypeRef(type_ref)],
        }
    }

    /// The type reference this type consists of, if it is nothing more than that
    pub fn as_reference(&self) -> Option<&TypeRef> {
        match self.nodes.as_slice() {
            [Node::TypeRef(type_ref)] => Some(type_ref),
            _ => None,
        }
    }
}

/// `: Type`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub colon: SyntaxToken,
    pub ty: TypeNode,
}

impl TypeAnnotation {
    pub fn new(ty: TypeNode) -> Self {
        Self {
            colon: SyntaxToken::punct(TokenKind::Colon, ":"),
            ty,
        }
    }
}
