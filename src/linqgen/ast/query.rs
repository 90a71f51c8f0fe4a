//! Queries over the syntax tree

use super::class::{ClassDecl, Member, MethodDecl};
use super::nodes::{Node, SourceFile};

/// Class declarations of a file in source order
///
/// Nested classes are not reported: the search stops at the first class on each path.
/// Class expressions are skipped.
pub fn class_declarations(file: &SourceFile) -> Vec<&ClassDecl> {
    let mut classes = Vec::new();
    collect_classes(&file.nodes, &mut classes);
    classes
}

fn collect_classes<'a>(nodes: &'a [Node], classes: &mut Vec<&'a ClassDecl>) {
    for node in nodes {
        match node {
            Node::Class(class) if !class.is_expression => classes.push(class),
            Node::Group(group) => collect_classes(&group.children, classes),
            Node::ForOf(for_of) => collect_classes(&for_of.head.children, classes),
            Node::Await(await_expr) => collect_classes(&await_expr.operand, classes),
            _ => {}
        }
    }
}

/// Find a class declaration by name
pub fn find_class<'a>(file: &'a SourceFile, name: &str) -> Option<&'a ClassDecl> {
    class_declarations(file)
        .into_iter()
        .find(|class| class.name_text() == Some(name))
}

/// Methods of a class with an identifier name equal to `name`
pub fn methods_named<'a>(class: &'a ClassDecl, name: &str) -> Vec<&'a MethodDecl> {
    class
        .members()
        .iter()
        .filter_map(|member| match member {
            Member::Method(method) if method.name.identifier() == Some(name) => Some(method),
            _ => None,
        })
        .collect()
}

/// Indentation of a member, taken from the last line of its leading trivia
///
/// Falls back to four spaces when the trivia does not end with a whitespace-only line.
pub fn indentation(leading: &str) -> &str {
    let last_line = leading.rsplit('\n').next().unwrap_or("");
    if leading.contains('\n') && last_line.chars().all(|c| c == ' ' || c == '\t') {
        last_line
    } else {
        "    "
    }
}
