//! Member pieces shared by both rewriters
//!
//! A wrapped stream method `where(p)` becomes two members:
//!
//!     public where(p: P): Enumerable<T> {
//!         return new Enumerable(this.whereImpl(p));
//!     }
//!     private *whereImpl(p: P): Iterable<T> { ...template body... }
//!
//! The wrapper runs eagerly, so argument validation in the template body still happens
//! at call time once the body moves into the lazy implementation method.

use super::{Classified, CodegenError};
use crate::linqgen::ast::{
    query, AccessorDecl, Delimiter, Group, Member, MethodDecl, Node, ParameterList, PropertyAccess,
    PropertyName, TypeAnnotation, TypeNode, TypeRef,
};
use crate::linqgen::config::NamingConvention;
use crate::linqgen::token::{SyntaxToken, TokenKind};

const VISIBILITY: &[&str] = &["public", "private", "protected"];

/// `modifiers` without any occurrence of `word`
pub fn without_modifier(modifiers: &[SyntaxToken], word: &str) -> Vec<SyntaxToken> {
    modifiers.iter().filter(|modifier| !modifier.is_word(word)).cloned().collect()
}

/// `private` followed by the non-visibility modifiers
pub fn make_private(modifiers: &[SyntaxToken]) -> Vec<SyntaxToken> {
    with_visibility("private", modifiers)
}

/// `public`, the non-visibility modifiers, and `async` when it was missing
pub fn make_public_async(modifiers: &[SyntaxToken]) -> Vec<SyntaxToken> {
    let mut result = with_visibility("public", modifiers);
    if !result.iter().any(|modifier| modifier.is_word("async")) {
        result.push(SyntaxToken::identifier("async", " "));
    }
    result
}

fn with_visibility(visibility: &str, modifiers: &[SyntaxToken]) -> Vec<SyntaxToken> {
    let mut result = vec![SyntaxToken::identifier(visibility, "")];
    result.extend(
        modifiers
            .iter()
            .filter(|modifier| !VISIBILITY.contains(&modifier.text.as_str()))
            .cloned(),
    );
    result
}

/// Space out a header whose tokens were added, removed or moved
///
/// The first token has no trivia of its own (the member's `leading` holds it), later
/// tokens get a single space when they had none, and the name sticks to a `*`.
pub fn normalize_header(method: &mut MethodDecl) {
    let mut first = true;
    for modifier in &mut method.modifiers {
        space(modifier, first);
        first = false;
    }
    if let Some(asterisk) = &mut method.asterisk {
        space(asterisk, first);
        first = false;
    }
    let after_asterisk = method.asterisk.is_some();
    let name = method.name.first_token_mut();
    if after_asterisk {
        name.leading.clear();
    } else {
        space(name, first);
    }
}

pub fn normalize_accessor_header(accessor: &mut AccessorDecl) {
    let mut first = true;
    for modifier in &mut accessor.modifiers {
        space(modifier, first);
        first = false;
    }
    space(&mut accessor.get_keyword, first);
    space(accessor.name.first_token_mut(), false);
}

fn space(token: &mut SyntaxToken, first: bool) {
    if first {
        token.leading.clear();
    } else if token.leading.is_empty() {
        token.leading.push(' ');
    }
}

/// How a wrapped stream method is split for one output flavour
pub struct WrapperSplit<'a> {
    /// The class the wrapper returns an instance of
    pub owning_class: &'a str,
    /// The sequence type the implementation method returns
    pub sequence_type: &'a str,
    /// Whether the implementation keeps `async`
    pub async_impl: bool,
}

/// The pieces of a template method, already converted for the output flavour
#[derive(Debug, Clone)]
pub struct ConvertedParts {
    pub type_parameters: Vec<Node>,
    pub parameters: ParameterList,
    pub body: Group,
}

impl WrapperSplit<'_> {
    /// Build the wrapper and implementation members
    pub fn apply(
        &self,
        method: &Classified,
        naming: &NamingConvention,
        parts: ConvertedParts,
    ) -> Result<Vec<Member>, CodegenError> {
        let ConvertedParts {
            type_parameters,
            parameters,
            body,
        } = parts;
        let template = method.method;
        let name = template
            .name
            .identifier()
            .ok_or_else(|| CodegenError::NonIdentifierMethodName {
                method: method.name.clone(),
            })?;
        let impl_name = naming.impl_name(name);
        let arguments = forwarded_arguments(&parameters, &method.name)?;
        let element = method.return_type.arguments.clone();
        let indent = query::indentation(&template.leading).to_string();
        let statement_indent = statement_indentation(method.body, &indent);
        let colon = template
            .return_type
            .as_ref()
            .map(|annotation| annotation.colon.clone())
            .unwrap_or_else(|| SyntaxToken::punct(TokenKind::Colon, ":"));

        let mut wrapper = template.clone();
        wrapper.decorators.clear();
        wrapper.modifiers = without_modifier(&template.modifiers, "async");
        wrapper.asterisk = None;
        wrapper.type_parameters = type_parameters.clone();
        wrapper.parameters = parameters.clone();
        wrapper.return_type = Some(TypeAnnotation {
            colon: colon.clone(),
            ty: TypeNode::reference(TypeRef::simple(self.owning_class, " ", element.clone())),
        });
        wrapper.body = Some(wrapper_body(
            self.owning_class,
            &impl_name,
            arguments,
            &indent,
            &statement_indent,
        ));
        wrapper.terminator = None;
        normalize_header(&mut wrapper);

        let mut implementation = template.clone();
        implementation.leading = format!("\n{}", indent);
        implementation.decorators.clear();
        implementation.modifiers = if self.async_impl {
            make_private(&template.modifiers)
        } else {
            make_private(&without_modifier(&template.modifiers, "async"))
        };
        implementation.name = PropertyName::Identifier(SyntaxToken::identifier(impl_name, ""));
        implementation.type_parameters = type_parameters;
        implementation.parameters = parameters;
        implementation.return_type = Some(TypeAnnotation {
            colon,
            ty: TypeNode::reference(TypeRef::simple(self.sequence_type, " ", element)),
        });
        implementation.body = Some(body);
        implementation.terminator = None;
        normalize_header(&mut implementation);

        Ok(vec![Member::Method(wrapper), Member::Method(implementation)])
    }
}

/// Parameter names as call arguments, `...` kept for rest parameters
fn forwarded_arguments(parameters: &ParameterList, method: &str) -> Result<Vec<Node>, CodegenError> {
    let mut forwarded = Vec::new();
    for parameter in &parameters.parameters {
        let identifier = parameter
            .identifier()
            .ok_or_else(|| CodegenError::NonIdentifierParameter {
                method: method.to_string(),
            })?;
        if identifier.text != "this" {
            forwarded.push((parameter.rest.is_some(), identifier.text.clone()));
        }
    }

    let mut nodes = Vec::new();
    for (index, (rest, name)) in forwarded.iter().enumerate() {
        let leading = if index == 0 { "" } else { " " };
        if *rest {
            nodes.push(Node::Token(
                SyntaxToken::punct(TokenKind::Ellipsis, "...").with_leading(leading),
            ));
            nodes.push(Node::Token(SyntaxToken::identifier(name.as_str(), "")));
        } else {
            nodes.push(Node::Token(SyntaxToken::identifier(name.as_str(), leading)));
        }
        if index + 1 < forwarded.len() {
            nodes.push(Node::Token(SyntaxToken::punct(TokenKind::Comma, ",")));
        }
    }
    Ok(nodes)
}

/// Indentation of the statements in `body`, or one level below `indent`
fn statement_indentation(body: &Group, indent: &str) -> String {
    body.children
        .first()
        .map(Node::leading)
        .filter(|leading| leading.contains('\n'))
        .map(|leading| query::indentation(leading).to_string())
        .unwrap_or_else(|| format!("{}    ", indent))
}

/// `{ return new Owner(this.nameImpl(args)); }`
fn wrapper_body(
    owning_class: &str,
    impl_name: &str,
    arguments: Vec<Node>,
    indent: &str,
    statement_indent: &str,
) -> Group {
    let call = Group::new(
        Delimiter::Paren,
        "",
        vec![
            Node::PropertyAccess(PropertyAccess {
                object: SyntaxToken::identifier("this", ""),
                dot: SyntaxToken::punct(TokenKind::Dot, "."),
                name: SyntaxToken::identifier(impl_name, ""),
            }),
            Node::Group(Group::new(Delimiter::Paren, "", arguments, "")),
        ],
        "",
    );
    Group::new(
        Delimiter::Brace,
        " ",
        vec![
            Node::Token(SyntaxToken::identifier("return", format!("\n{}", statement_indent))),
            Node::Token(SyntaxToken::identifier("new", " ")),
            Node::Token(SyntaxToken::identifier(owning_class, " ")),
            Node::Group(call),
            Node::Token(SyntaxToken::punct(TokenKind::Semicolon, ";")),
        ],
        &format!("\n{}", indent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linqgen::formats::ToSource;

    fn words(modifiers: &[SyntaxToken]) -> Vec<&str> {
        modifiers.iter().map(|modifier| modifier.text.as_str()).collect()
    }

    fn tokens(text: &[&str]) -> Vec<SyntaxToken> {
        text.iter().map(|word| SyntaxToken::identifier(*word, " ")).collect()
    }

    #[test]
    fn test_visibility_rewrites() {
        let modifiers = tokens(&["protected", "static", "async"]);
        assert_eq!(words(&make_private(&modifiers)), ["private", "static", "async"]);
        assert_eq!(words(&make_public_async(&modifiers)), ["public", "static", "async"]);
        assert_eq!(words(&make_public_async(&tokens(&["public"]))), ["public", "async"]);
        assert_eq!(words(&without_modifier(&modifiers, "async")), ["protected", "static"]);
    }

    #[test]
    fn test_wrapper_body_layout() {
        let body = wrapper_body(
            "Enumerable",
            "appendImpl",
            vec![Node::Token(SyntaxToken::identifier("element", ""))],
            "    ",
            "        ",
        );
        assert_eq!(
            body.to_source(),
            " {\n        return new Enumerable(this.appendImpl(element));\n    }"
        );
    }
}
