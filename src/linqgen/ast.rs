//! Syntax tree for TypeScript sources
//!
//!     The tree is a token tree refined into a small closed set of structured node kinds.
//!     Only the constructs the generator reads or rewrites get their own variant:
//!
//!         - Class declarations, with their members split into methods, get-accessors and
//!           everything else. See [class](class).
//!         - Type references (`Promise<T>`, `Foo.Bar`), in signatures and wherever a body
//!           spells one out. See [types](types).
//!         - For-of statements, `await` expressions and `X.y` property accesses. See
//!           [nodes](nodes).
//!
//!     Every other construct is kept as plain tokens or bracket groups. Nothing in the tree
//!     is ever mutated once built: rewrites produce new values and clone what they keep.
//!
//! Printing
//!
//!     Every token carries its leading trivia, so printing a tree is a plain in-order walk.
//!     See [crate::linqgen::formats].

pub mod class;
pub mod nodes;
pub mod query;
pub mod types;

pub use class::{
    AccessorDecl, Binding, ClassBody, ClassDecl, Decorator, Initializer, Member, MethodDecl,
    Parameter, ParameterList, PropertyName,
};
pub use nodes::{inherit_leading, AwaitExpr, Delimiter, ForOf, Group, Node, PropertyAccess, SourceFile};
pub use types::{TypeAnnotation, TypeArgument, TypeArguments, TypeNode, TypeRef};
