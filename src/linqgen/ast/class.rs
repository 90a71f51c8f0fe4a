//! Class declarations and their members
//!
//!     A class keeps its keyword, its name, everything between the name and the body
//!     (type parameters, `extends`, `implements`) as plain nodes, and its body as a list of
//!     [Member]s. Members the generator reads are structured:
//!
//!         - [MethodDecl] for methods, with or without a body.
//!         - [AccessorDecl] for `get` accessors.
//!
//!     Anything else (properties, constructors, `set` accessors, index signatures, stray
//!     semicolons) is a [Member::Other] holding the nodes it was written with.
//!
//! Leading Trivia
//!
//!     The whitespace and comments in front of a structured member are moved out of its
//!     first token into `leading`. A member can then be cloned, have decorators or modifiers
//!     removed, and still be printed on its own line with its comments.

use super::nodes::{Group, Node};
use super::types::{TypeAnnotation, TypeNode};
use crate::linqgen::token::{SyntaxToken, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub keyword: SyntaxToken,
    pub name: Option<SyntaxToken>,
    /// Type parameters and heritage clauses, up to the body
    pub heritage: Vec<Node>,
    pub body: ClassBody,
    /// True for class expressions (`const X = class {}`)
    pub is_expression: bool,
}

impl ClassDecl {
    pub fn name_text(&self) -> Option<&str> {
        self.name.as_ref().map(|name| name.text.as_str())
    }

    pub fn members(&self) -> &[Member] {
        &self.body.members
    }

    /// A copy of this class with a different member list
    pub fn with_members(&self, members: Vec<Member>) -> Self {
        Self {
            keyword: self.keyword.clone(),
            name: self.name.clone(),
            heritage: self.heritage.clone(),
            body: ClassBody {
                open: self.body.open.clone(),
                members,
                close: self.body.close.clone(),
            },
            is_expression: self.is_expression,
        }
    }

    /// Rebuild the class, passing every node sequence it contains through `f`
    ///
    /// Heritage, decorators, parameter types and initializers, return types, bodies and
    /// opaque members are all mapped; the structure of the class itself is kept.
    pub fn try_map_nodes<E, F>(&self, f: &mut F) -> Result<ClassDecl, E>
    where
        F: FnMut(&[Node]) -> Result<Vec<Node>, E>,
    {
        let members = self
            .body
            .members
            .iter()
            .map(|member| member.try_map_nodes(f))
            .collect::<Result<Vec<_>, E>>()?;
        let mut class = self.with_members(members);
        class.heritage = f(&self.heritage)?;
        Ok(class)
    }
}

/// `{ members }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBody {
    pub open: SyntaxToken,
    pub members: Vec<Member>,
    pub close: SyntaxToken,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Method(MethodDecl),
    Getter(AccessorDecl),
    Other(Vec<Node>),
}

impl Member {
    fn try_map_nodes<E, F>(&self, f: &mut F) -> Result<Member, E>
    where
        F: FnMut(&[Node]) -> Result<Vec<Node>, E>,
    {
        Ok(match self {
            Member::Method(method) => {
                let mut mapped = method.clone();
                mapped.decorators = map_decorators(&method.decorators, f)?;
                mapped.name = method.name.try_map_nodes(f)?;
                mapped.type_parameters = f(&method.type_parameters)?;
                mapped.parameters = method.parameters.try_map_nodes(f)?;
                mapped.return_type = map_annotation(method.return_type.as_ref(), f)?;
                mapped.body = map_group(method.body.as_ref(), f)?;
                Member::Method(mapped)
            }
            Member::Getter(getter) => {
                let mut mapped = getter.clone();
                mapped.decorators = map_decorators(&getter.decorators, f)?;
                mapped.name = getter.name.try_map_nodes(f)?;
                mapped.parameters = getter.parameters.try_map_nodes(f)?;
                mapped.return_type = map_annotation(getter.return_type.as_ref(), f)?;
                mapped.body = map_group(getter.body.as_ref(), f)?;
                Member::Getter(mapped)
            }
            Member::Other(nodes) => Member::Other(f(nodes)?),
        })
    }
}

fn map_decorators<E, F>(decorators: &[Decorator], f: &mut F) -> Result<Vec<Decorator>, E>
where
    F: FnMut(&[Node]) -> Result<Vec<Node>, E>,
{
    decorators
        .iter()
        .map(|decorator| {
            Ok(Decorator {
                at: decorator.at.clone(),
                expression: f(&decorator.expression)?,
            })
        })
        .collect()
}

fn map_annotation<E, F>(annotation: Option<&TypeAnnotation>, f: &mut F) -> Result<Option<TypeAnnotation>, E>
where
    F: FnMut(&[Node]) -> Result<Vec<Node>, E>,
{
    annotation
        .map(|annotation| {
            Ok(TypeAnnotation {
                colon: annotation.colon.clone(),
                ty: TypeNode {
                    nodes: f(&annotation.ty.nodes)?,
                },
            })
        })
        .transpose()
}

fn map_group<E, F>(group: Option<&Group>, f: &mut F) -> Result<Option<Group>, E>
where
    F: FnMut(&[Node]) -> Result<Vec<Node>, E>,
{
    group
        .map(|group| Ok(group.with_children(f(&group.children)?)))
        .transpose()
}

/// `@expression`
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub at: SyntaxToken,
    pub expression: Vec<Node>,
}

impl Decorator {
    /// The decorator's name when it is a bare identifier (`@enumerableWrapper`)
    pub fn identifier(&self) -> Option<&str> {
        match self.expression.as_slice() {
            [Node::Token(token)] if token.is(TokenKind::Identifier) => Some(token.text.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyName {
    Identifier(SyntaxToken),
    /// `[expression]`
    Computed(Group),
    /// String or numeric literal, or a `#private` name
    Literal(SyntaxToken),
}

impl PropertyName {
    pub fn identifier(&self) -> Option<&str> {
        match self {
            PropertyName::Identifier(token) => Some(token.text.as_str()),
            _ => None,
        }
    }

    pub fn first_token_mut(&mut self) -> &mut SyntaxToken {
        match self {
            PropertyName::Identifier(token) | PropertyName::Literal(token) => token,
            PropertyName::Computed(group) => &mut group.open,
        }
    }

    fn try_map_nodes<E, F>(&self, f: &mut F) -> Result<PropertyName, E>
    where
        F: FnMut(&[Node]) -> Result<Vec<Node>, E>,
    {
        Ok(match self {
            PropertyName::Computed(group) => PropertyName::Computed(group.with_children(f(&group.children)?)),
            other => other.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Identifier(SyntaxToken),
    /// Object or array destructuring pattern
    Pattern(Group),
}

/// `= value`
#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    pub equals: SyntaxToken,
    pub value: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter properties (`private readonly x`)
    pub modifiers: Vec<SyntaxToken>,
    pub rest: Option<SyntaxToken>,
    pub binding: Binding,
    pub question: Option<SyntaxToken>,
    pub annotation: Option<TypeAnnotation>,
    pub initializer: Option<Initializer>,
    pub comma: Option<SyntaxToken>,
}

impl Parameter {
    pub fn identifier(&self) -> Option<&SyntaxToken> {
        match &self.binding {
            Binding::Identifier(token) => Some(token),
            Binding::Pattern(_) => None,
        }
    }

    fn try_map_nodes<E, F>(&self, f: &mut F) -> Result<Parameter, E>
    where
        F: FnMut(&[Node]) -> Result<Vec<Node>, E>,
    {
        let mut mapped = self.clone();
        if let Binding::Pattern(group) = &self.binding {
            mapped.binding = Binding::Pattern(group.with_children(f(&group.children)?));
        }
        mapped.annotation = map_annotation(self.annotation.as_ref(), f)?;
        if let Some(initializer) = &self.initializer {
            mapped.initializer = Some(Initializer {
                equals: initializer.equals.clone(),
                value: f(&initializer.value)?,
            });
        }
        Ok(mapped)
    }
}

/// `(parameters)`
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterList {
    pub open: SyntaxToken,
    pub parameters: Vec<Parameter>,
    pub close: SyntaxToken,
}

impl ParameterList {
    pub fn try_map_nodes<E, F>(&self, f: &mut F) -> Result<ParameterList, E>
    where
        F: FnMut(&[Node]) -> Result<Vec<Node>, E>,
    {
        Ok(ParameterList {
            open: self.open.clone(),
            parameters: self
                .parameters
                .iter()
                .map(|parameter| parameter.try_map_nodes(f))
                .collect::<Result<Vec<_>, E>>()?,
            close: self.close.clone(),
        })
    }
}

/// A method declaration
///
/// `body` is `None` for signatures (overloads and abstract methods), which are terminated by
/// an optional `;` kept in `terminator`.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub leading: String,
    pub decorators: Vec<Decorator>,
    pub modifiers: Vec<SyntaxToken>,
    pub asterisk: Option<SyntaxToken>,
    pub name: PropertyName,
    pub question: Option<SyntaxToken>,
    /// `<T, U>` as written, empty when the method is not generic
    pub type_parameters: Vec<Node>,
    pub parameters: ParameterList,
    pub return_type: Option<TypeAnnotation>,
    pub body: Option<Group>,
    pub terminator: Option<SyntaxToken>,
}

impl MethodDecl {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|token| token.text == modifier)
    }

    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators
            .iter()
            .any(|decorator| decorator.identifier() == Some(name))
    }

    /// The first token that would be printed after the leading trivia
    pub fn first_token_mut(&mut self) -> &mut SyntaxToken {
        if let Some(decorator) = self.decorators.first_mut() {
            return &mut decorator.at;
        }
        if let Some(modifier) = self.modifiers.first_mut() {
            return modifier;
        }
        if let Some(asterisk) = self.asterisk.as_mut() {
            return asterisk;
        }
        self.name.first_token_mut()
    }
}

/// A `get` accessor
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorDecl {
    pub leading: String,
    pub decorators: Vec<Decorator>,
    pub modifiers: Vec<SyntaxToken>,
    pub get_keyword: SyntaxToken,
    pub name: PropertyName,
    pub parameters: ParameterList,
    pub return_type: Option<TypeAnnotation>,
    pub body: Option<Group>,
    pub terminator: Option<SyntaxToken>,
}

impl AccessorDecl {
    pub fn first_token_mut(&mut self) -> &mut SyntaxToken {
        if let Some(decorator) = self.decorators.first_mut() {
            return &mut decorator.at;
        }
        if let Some(modifier) = self.modifiers.first_mut() {
            return modifier;
        }
        &mut self.get_keyword
    }
}
