//! Method classification
//!
//! A template method is accepted only if it can be rewritten mechanically. The checks run
//! in order and the first failure is reported:
//!
//!     1. it has a return type,
//!     2. the return type is a plain type reference,
//!     3. that reference is not qualified,
//!     4. it has a body (overload signatures are rejected).
//!
//! The strategy is then read off the return type identifier alone.

use super::CodegenError;
use crate::linqgen::ast::{Group, MethodDecl, Node, PropertyName, TypeRef};
use crate::linqgen::config::NamingConvention;
use crate::linqgen::formats::ToSource;

/// Eventual single value
const EVENTUAL_VALUE: &str = "Promise";
/// Asynchronous sequence, wrapped when marked
const ASYNC_SEQUENCE: &str = "AsyncIterable";
/// Sequence-like types that are copied but never wrapped
const UNWRAPPED_SEQUENCES: &[&str] = &["AsyncIterator", "AsyncSortedEnumerable"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Aggregate,
    Stream { wrapper: bool },
}

/// A template method that passed the shape checks
#[derive(Debug, Clone)]
pub struct Classified<'a> {
    pub method: &'a MethodDecl,
    /// Printable name, used in messages and as the base of the implementation name
    pub name: String,
    pub return_type: &'a TypeRef,
    pub body: &'a Group,
    pub strategy: Strategy,
}

/// The name of a method as it is written in messages
///
/// Identifiers print as themselves and `[Symbol.xyz]` prints as written. Anything else is
/// rejected.
pub fn printable_name(name: &PropertyName) -> Result<String, CodegenError> {
    match name {
        PropertyName::Identifier(token) => Ok(token.text.clone()),
        PropertyName::Computed(group) => match group.children.as_slice() {
            [Node::PropertyAccess(access)] if access.object.text == "Symbol" => {
                Ok(format!("[Symbol.{}]", access.name.text))
            }
            _ => Err(CodegenError::InvalidMethodName {
                name: group.to_source().trim().to_string(),
            }),
        },
        PropertyName::Literal(token) => Err(CodegenError::InvalidMethodName {
            name: token.text.clone(),
        }),
    }
}

pub fn classify<'a>(method: &'a MethodDecl, naming: &NamingConvention) -> Result<Classified<'a>, CodegenError> {
    let name = printable_name(&method.name)?;

    let Some(annotation) = &method.return_type else {
        return Err(CodegenError::MissingReturnType { method: name });
    };
    let Some(return_type) = annotation.ty.as_reference() else {
        return Err(CodegenError::NonReferenceReturnType { method: name });
    };
    let Some(identifier) = return_type.identifier() else {
        return Err(CodegenError::QualifiedReturnType {
            name: return_type.name_text(),
            method: name,
        });
    };
    let Some(body) = &method.body else {
        return Err(CodegenError::MissingBody { method: name });
    };

    let marked = method.has_decorator(&naming.wrapper_marker);
    let identifier = identifier.text.as_str();
    let strategy = if identifier == naming.wrapper_placeholder {
        Strategy::Stream { wrapper: true }
    } else if identifier == ASYNC_SEQUENCE {
        Strategy::Stream { wrapper: marked }
    } else if identifier == EVENTUAL_VALUE || UNWRAPPED_SEQUENCES.contains(&identifier) {
        if marked {
            return Err(CodegenError::MarkerOnUnwrappable {
                method: name,
                marker: naming.wrapper_marker.clone(),
                identifier: identifier.to_string(),
            });
        }
        if identifier == EVENTUAL_VALUE {
            Strategy::Aggregate
        } else {
            Strategy::Stream { wrapper: false }
        }
    } else {
        return Err(CodegenError::UnknownReturnType {
            method: name,
            identifier: identifier.to_string(),
        });
    };

    Ok(Classified {
        method,
        name,
        return_type,
        body,
        strategy,
    })
}
