//! Parser
//!
//!     This module builds the [SourceFile] syntax tree from TypeScript source text. The
//!     parser is not a TypeScript parser: it understands exactly the constructs the
//!     generator reads (classes, their methods, parameter lists and type references) and
//!     keeps everything else as opaque tokens and bracket groups.
//!
//! Passes
//!
//!     1. Lexing: the logos lexer plus trivia folding, see [crate::linqgen::lexing].
//!     2. Token tree: bracket matching into nested groups, see [token_tree].
//!     3. Refinement: recognizes structured nodes in every node sequence of the tree,
//!        descending into groups, see [refine]. Class bodies are handed to [members], and
//!        type annotations to [types].
//!
//!     Each pass is a pure function from the previous pass's output. Bracket errors are the
//!     only way an arbitrary token sequence fails; the structured passes fail only inside
//!     class bodies, where a member cannot be recognized.
//!
//! Errors
//!
//!     The inner passes report a [RawError], a kind plus a byte offset. [parse_source]
//!     turns it into a [ParseError] carrying the file name, line and column.

pub mod cursor;
pub mod members;
pub mod refine;
pub mod token_tree;
pub mod types;

use crate::linqgen::ast::{SourceFile, TypeNode};
use crate::linqgen::lexing::{self, line_column};
use thiserror::Error;

/// What went wrong while parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected `{found}` in {context}")]
    Unexpected { found: String, context: &'static str },
    #[error("unexpected end of {context}")]
    UnexpectedEnd { context: &'static str },
    #[error("`{open}` is never closed")]
    Unclosed { open: String },
    #[error("found `{found}` where `{expected}` was expected")]
    Mismatched { found: String, expected: &'static str },
}

/// A parse error located by byte offset only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawError {
    pub kind: ParseErrorKind,
    pub offset: Option<usize>,
}

impl RawError {
    pub fn new(kind: ParseErrorKind, offset: Option<usize>) -> Self {
        Self { kind, offset }
    }

    /// Attach a file name and turn the offset into a line and column
    pub fn locate(self, file: &str, source: &str) -> ParseError {
        let (line, column) = line_column(source, self.offset.unwrap_or(source.len()));
        ParseError {
            file: file.to_string(),
            line,
            column,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}:{column}: {kind}")]
pub struct ParseError {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub kind: ParseErrorKind,
}

/// Parse a source file
pub fn parse_source(file_name: &str, source: &str) -> Result<SourceFile, ParseError> {
    let output = lexing::tokenize(source);
    let nodes = token_tree::build(output.tokens)
        .and_then(|tree| refine::refine(&tree, None))
        .map_err(|error| error.locate(file_name, source))?;

    Ok(SourceFile {
        file_name: file_name.to_string(),
        nodes,
        trailing: output.trailing,
    })
}

/// Parse a standalone type, such as `Promise<T>`
pub fn parse_type(source: &str) -> Result<TypeNode, ParseError> {
    let output = lexing::tokenize(source);
    let tree = token_tree::build(output.tokens).map_err(|error| error.locate("<type>", source))?;
    let mut cursor = cursor::Cursor::new(&tree);
    let ty = types::parse_type(&mut cursor).map_err(|error| error.locate("<type>", source))?;
    if !cursor.is_at_end() {
        return Err(cursor.unexpected("a type").locate("<type>", source));
    }
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linqgen::ast::query::class_declarations;
    use crate::linqgen::ast::{Member, Node};

    #[test]
    fn test_parse_error_is_located() {
        let error = parse_source("broken.ts", "class A {\n    foo() {\n}\n").unwrap_err();
        assert_eq!(error.file, "broken.ts");
        assert_eq!((error.line, error.column), (1, 9));
        assert_eq!(error.to_string(), "broken.ts:1:9: `{` is never closed");
    }

    #[test]
    fn test_member_error_is_located() {
        let error = parse_source("bad.ts", "class A {\n    = 1;\n}").unwrap_err();
        assert_eq!((error.line, error.column), (2, 5));
        assert!(matches!(error.kind, ParseErrorKind::Unexpected { .. }));
    }

    #[test]
    fn test_parse_source_finds_classes() {
        let file = parse_source(
            "a.ts",
            "export class AEnumerable<T> {\n    public count(): Promise<number> {\n        return 1;\n    }\n}\n",
        )
        .unwrap();
        let classes = class_declarations(&file);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name_text(), Some("AEnumerable"));
        assert!(matches!(classes[0].members()[0], Member::Method(_)));
        assert_eq!(file.trailing, "\n");
    }

    #[test]
    fn test_doc_commented_members() {
        let source = "class A<T> {\n    /**\n     * @override\n     */\n    protected get iterable(): AsyncIterable<T> {\n        return this.source;\n    }\n\n    /** Counts. */\n    public async count(): Promise<number> {\n        return 0;\n    }\n}\n";
        let file = parse_source("a.ts", source).unwrap();
        let members = class_declarations(&file)[0].members();
        assert_eq!(members.len(), 2);
        let Member::Getter(getter) = &members[0] else {
            panic!("expected a getter, got {:?}", members[0]);
        };
        assert_eq!(getter.leading, "\n    /**\n     * @override\n     */\n    ");
        let Member::Method(method) = &members[1] else {
            panic!("expected a method, got {:?}", members[1]);
        };
        assert_eq!(method.leading, "\n\n    /** Counts. */\n    ");
    }

    #[test]
    fn test_regex_literal_with_brackets() {
        let file = parse_source("a.ts", "const re = /[(]/;\nconst close = /}/g;\n").unwrap();
        assert_eq!(file.nodes.len(), 10);
    }

    #[test]
    fn test_parse_type() {
        let ty = parse_type("AsyncIterable<Grouping<K, T>>").unwrap();
        let type_ref = ty.as_reference().unwrap();
        assert_eq!(type_ref.name_text(), "AsyncIterable");
        assert_eq!(type_ref.argument_count(), 1);
        let first = type_ref.arguments.as_ref().unwrap().first().unwrap();
        assert!(matches!(first, [Node::TypeRef(inner)] if inner.argument_count() == 2));

        assert!(parse_type("A B").is_err());
    }
}
