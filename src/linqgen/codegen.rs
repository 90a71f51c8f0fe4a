//! Code generation
//!
//!     Expands the methods of a template class into the synchronous and the asynchronous
//!     public classes. The template is written once, in the asynchronous idiom; each output
//!     flavour has a [MemberRewriter] deciding how a template member is turned into zero or
//!     more generated members.
//!
//! Structure
//!
//!     - [classify]: validates the shape of a template method and picks its rewrite
//!       strategy from its return type.
//!     - [convert]: the asynchronous to synchronous conversions of types and bodies.
//!     - [split]: pieces shared by both rewriters (modifier handling, the wrapper/impl
//!       split, header spacing).
//!     - [synchronous] and [asynchronous]: the two rewriters.
//!     - [driver]: walks a skeleton file and appends the generated members to its target
//!       classes.
//!
//! Strategies
//!
//!     A method returning `Promise<T>` is an aggregate: one value, computed eagerly. A
//!     method returning an asynchronous sequence is a stream. Streams marked with the wrapper
//!     decorator (or declared with the placeholder return type) are split into a public
//!     wrapper, which validates its arguments and returns the owning class right away, and
//!     a private lazy implementation the wrapper hands to the owning class.

pub mod asynchronous;
pub mod classify;
pub mod convert;
pub mod driver;
pub mod split;
pub mod synchronous;

pub use asynchronous::AsynchronousRewriter;
pub use classify::{classify, Classified, Strategy};
pub use driver::{Generator, TemplateIndex};
pub use synchronous::SynchronousRewriter;

use crate::linqgen::ast::{AccessorDecl, Member, MethodDecl};
use crate::linqgen::config::NamingConvention;
use thiserror::Error;

/// Which public class is being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Synchronous,
    Asynchronous,
}

impl std::fmt::Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flavor::Synchronous => write!(f, "synchronous"),
            Flavor::Asynchronous => write!(f, "asynchronous"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("Implementation method {method}() must have an explicit return type.")]
    MissingReturnType { method: String },
    #[error("Implementation method {method}() must use a type reference as its return type.")]
    NonReferenceReturnType { method: String },
    #[error("Implementation method {method}() must not use the qualified name {name} as its return type.")]
    QualifiedReturnType { method: String, name: String },
    #[error("Implementation method {method}() must have a body.")]
    MissingBody { method: String },
    #[error("Implementation method {method}() has unknown return type {identifier}.")]
    UnknownReturnType { method: String, identifier: String },
    #[error("{identifier} in {method}() must be used with a type argument.")]
    MissingTypeArgument { method: String, identifier: String },
    #[error("Implementation method {method}() is marked @{marker} but returns {identifier}, which cannot be wrapped.")]
    MarkerOnUnwrappable {
        method: String,
        marker: String,
        identifier: String,
    },
    #[error("Accessor {accessor} must have a body.")]
    AccessorWithoutBody { accessor: String },
    #[error("Accessor {accessor} must declare its return type with a type reference.")]
    AccessorReturnType { accessor: String },
    #[error("Only identifiers and [Symbol.xyz] are allowed as method names, found {name}.")]
    InvalidMethodName { name: String },
    #[error("Method {method} needs a wrapper and must use an identifier as its name.")]
    NonIdentifierMethodName { method: String },
    #[error("Method {method}() needs a wrapper and must use identifiers as parameter names.")]
    NonIdentifierParameter { method: String },
    #[error("Class declaration in {file} must have a name.")]
    AnonymousClass { file: String },
    #[error("Template file {file} must not contain anonymous classes.")]
    AnonymousTemplateClass { file: String },
    #[error("Template class {name} is declared more than once.")]
    DuplicateTemplateClass { name: String },
    #[error("Expected class {expected} in the template file for {target}, but no such class is defined.")]
    TemplateClassNotFound { expected: String, target: String },
    #[error("Class {class} must start with {prefix} to be generated as an asynchronous class.")]
    NamingConvention { class: String, prefix: String },
}

/// Turns template members into the members of one output flavour
pub trait MemberRewriter {
    fn naming(&self) -> &NamingConvention;

    /// A method producing one eventual value
    fn rewrite_aggregate(&self, method: &Classified, owning_class: &str) -> Result<Vec<Member>, CodegenError>;

    /// A sequence-producing method copied as a single member
    fn rewrite_stream(&self, method: &Classified, owning_class: &str) -> Result<Vec<Member>, CodegenError>;

    /// A sequence-producing method split into a wrapper and its implementation
    fn rewrite_wrapped_stream(&self, method: &Classified, owning_class: &str)
        -> Result<Vec<Member>, CodegenError>;

    fn rewrite_getter(&self, getter: &AccessorDecl, owning_class: &str) -> Result<Vec<Member>, CodegenError>;

    /// Classify a template method and rewrite it with the matching strategy
    fn rewrite_method(&self, method: &MethodDecl, owning_class: &str) -> Result<Vec<Member>, CodegenError> {
        let classified = classify(method, self.naming())?;
        match classified.strategy {
            Strategy::Aggregate => self.rewrite_aggregate(&classified, owning_class),
            Strategy::Stream { wrapper: false } => self.rewrite_stream(&classified, owning_class),
            Strategy::Stream { wrapper: true } => self.rewrite_wrapped_stream(&classified, owning_class),
        }
    }
}
