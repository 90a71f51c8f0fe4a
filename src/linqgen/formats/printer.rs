//! Printer for TypeScript syntax trees
//!
//! Every token is printed as its leading trivia followed by its text, in source order.
//! Structured nodes print the tokens they own in the order they were parsed, so printing a
//! tree that was not rewritten gives back the exact input.
use crate::linqgen::ast::{
    AccessorDecl, AwaitExpr, Binding, ClassDecl, Decorator, ForOf, Group, Member, MethodDecl, Node,
    Parameter, ParameterList, PropertyAccess, PropertyName, SourceFile, TypeAnnotation,
    TypeArguments, TypeNode, TypeRef,
};
use crate::linqgen::token::SyntaxToken;

/// Trait for converting a tree fragment to TypeScript source text
pub trait ToSource {
    fn write_source(&self, out: &mut String);

    fn to_source(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out);
        out
    }
}

/// Print a whole source file, trailing trivia included
pub fn print_file(file: &SourceFile) -> String {
    file.to_source()
}

fn write_all<T: ToSource>(items: &[T], out: &mut String) {
    for item in items {
        item.write_source(out);
    }
}

fn write_optional<T: ToSource>(item: &Option<T>, out: &mut String) {
    if let Some(item) = item {
        item.write_source(out);
    }
}

impl ToSource for SyntaxToken {
    fn write_source(&self, out: &mut String) {
        out.push_str(&self.leading);
        out.push_str(&self.text);
    }
}

impl ToSource for Node {
    fn write_source(&self, out: &mut String) {
        match self {
            Node::Token(token) => token.write_source(out),
            Node::Group(group) => group.write_source(out),
            Node::Class(class) => class.write_source(out),
            Node::ForOf(for_of) => for_of.write_source(out),
            Node::Await(await_expr) => await_expr.write_source(out),
            Node::PropertyAccess(access) => access.write_source(out),
            Node::TypeRef(type_ref) => type_ref.write_source(out),
        }
    }
}

impl ToSource for Group {
    fn write_source(&self, out: &mut String) {
        self.open.write_source(out);
        write_all(&self.children, out);
        self.close.write_source(out);
    }
}

impl ToSource for ForOf {
    fn write_source(&self, out: &mut String) {
        self.for_keyword.write_source(out);
        write_optional(&self.await_keyword, out);
        self.head.write_source(out);
    }
}

impl ToSource for AwaitExpr {
    fn write_source(&self, out: &mut String) {
        self.keyword.write_source(out);
        write_all(&self.operand, out);
    }
}

impl ToSource for PropertyAccess {
    fn write_source(&self, out: &mut String) {
        self.object.write_source(out);
        self.dot.write_source(out);
        self.name.write_source(out);
    }
}

impl ToSource for TypeRef {
    fn write_source(&self, out: &mut String) {
        write_all(&self.name, out);
        write_optional(&self.arguments, out);
    }
}

impl ToSource for TypeArguments {
    fn write_source(&self, out: &mut String) {
        self.open.write_source(out);
        for argument in &self.arguments {
            write_all(&argument.nodes, out);
            write_optional(&argument.comma, out);
        }
        self.close.write_source(out);
    }
}

impl ToSource for TypeNode {
    fn write_source(&self, out: &mut String) {
        write_all(&self.nodes, out);
    }
}

impl ToSource for TypeAnnotation {
    fn write_source(&self, out: &mut String) {
        self.colon.write_source(out);
        self.ty.write_source(out);
    }
}

impl ToSource for ClassDecl {
    fn write_source(&self, out: &mut String) {
        self.keyword.write_source(out);
        write_optional(&self.name, out);
        write_all(&self.heritage, out);
        self.body.open.write_source(out);
        write_all(&self.body.members, out);
        self.body.close.write_source(out);
    }
}

impl ToSource for Member {
    fn write_source(&self, out: &mut String) {
        match self {
            Member::Method(method) => method.write_source(out),
            Member::Getter(getter) => getter.write_source(out),
            Member::Other(nodes) => write_all(nodes, out),
        }
    }
}

impl ToSource for Decorator {
    fn write_source(&self, out: &mut String) {
        self.at.write_source(out);
        write_all(&self.expression, out);
    }
}

impl ToSource for PropertyName {
    fn write_source(&self, out: &mut String) {
        match self {
            PropertyName::Identifier(token) | PropertyName::Literal(token) => token.write_source(out),
            PropertyName::Computed(group) => group.write_source(out),
        }
    }
}

impl ToSource for Parameter {
    fn write_source(&self, out: &mut String) {
        write_all(&self.modifiers, out);
        write_optional(&self.rest, out);
        match &self.binding {
            Binding::Identifier(token) => token.write_source(out),
            Binding::Pattern(group) => group.write_source(out),
        }
        write_optional(&self.question, out);
        write_optional(&self.annotation, out);
        if let Some(initializer) = &self.initializer {
            initializer.equals.write_source(out);
            write_all(&initializer.value, out);
        }
        write_optional(&self.comma, out);
    }
}

impl ToSource for ParameterList {
    fn write_source(&self, out: &mut String) {
        self.open.write_source(out);
        write_all(&self.parameters, out);
        self.close.write_source(out);
    }
}

impl ToSource for MethodDecl {
    fn write_source(&self, out: &mut String) {
        out.push_str(&self.leading);
        write_all(&self.decorators, out);
        write_all(&self.modifiers, out);
        write_optional(&self.asterisk, out);
        self.name.write_source(out);
        write_optional(&self.question, out);
        write_all(&self.type_parameters, out);
        self.parameters.write_source(out);
        write_optional(&self.return_type, out);
        write_optional(&self.body, out);
        write_optional(&self.terminator, out);
    }
}

impl ToSource for AccessorDecl {
    fn write_source(&self, out: &mut String) {
        out.push_str(&self.leading);
        write_all(&self.decorators, out);
        write_all(&self.modifiers, out);
        self.get_keyword.write_source(out);
        self.name.write_source(out);
        self.parameters.write_source(out);
        write_optional(&self.return_type, out);
        write_optional(&self.body, out);
        write_optional(&self.terminator, out);
    }
}

impl ToSource for SourceFile {
    fn write_source(&self, out: &mut String) {
        write_all(&self.nodes, out);
        out.push_str(&self.trailing);
    }
}
