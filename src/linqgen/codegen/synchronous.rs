//! Synchronous rewriter
//!
//! Every member is converted with [SyncConverter]. Aggregates lose `async` and `*` and
//! return the unwrapped value, streams keep their `*` and become synchronous generators, and
//! getters are converted like aggregates.

use super::classify::printable_name;
use super::convert::SyncConverter;
use super::split::{self, ConvertedParts, WrapperSplit};
use super::{Classified, CodegenError, MemberRewriter};
use crate::linqgen::ast::{AccessorDecl, Member, MethodDecl, TypeAnnotation};
use crate::linqgen::config::{NamingConvention, TypeMapping};

pub struct SynchronousRewriter<'a> {
    naming: &'a NamingConvention,
    types: &'a TypeMapping,
}

impl<'a> SynchronousRewriter<'a> {
    pub fn new(naming: &'a NamingConvention, types: &'a TypeMapping) -> Self {
        Self { naming, types }
    }

    fn convert_method(&self, method: &Classified, generator: bool) -> Result<MethodDecl, CodegenError> {
        let template = method.method;
        let converter = SyncConverter::new(self.types, &method.name);

        let mut converted = template.clone();
        converted.decorators.clear();
        converted.modifiers = split::without_modifier(&template.modifiers, "async");
        if !generator {
            converted.asterisk = None;
        }
        converted.name = converter.name(&template.name)?;
        converted.type_parameters = converter.nodes(&template.type_parameters)?;
        converted.parameters = converter.parameters(&template.parameters)?;
        converted.return_type = template
            .return_type
            .as_ref()
            .map(|annotation| -> Result<_, CodegenError> {
                Ok(TypeAnnotation {
                    colon: annotation.colon.clone(),
                    ty: converter.return_type(method.return_type)?,
                })
            })
            .transpose()?;
        converted.body = Some(converter.body(method.body)?);
        split::normalize_header(&mut converted);
        Ok(converted)
    }
}

impl MemberRewriter for SynchronousRewriter<'_> {
    fn naming(&self) -> &NamingConvention {
        self.naming
    }

    fn rewrite_aggregate(&self, method: &Classified, _owning_class: &str) -> Result<Vec<Member>, CodegenError> {
        Ok(vec![Member::Method(self.convert_method(method, false)?)])
    }

    fn rewrite_stream(&self, method: &Classified, _owning_class: &str) -> Result<Vec<Member>, CodegenError> {
        Ok(vec![Member::Method(self.convert_method(method, true)?)])
    }

    fn rewrite_wrapped_stream(
        &self,
        method: &Classified,
        owning_class: &str,
    ) -> Result<Vec<Member>, CodegenError> {
        let converter = SyncConverter::new(self.types, &method.name);
        let parts = ConvertedParts {
            type_parameters: converter.nodes(&method.method.type_parameters)?,
            parameters: converter.parameters(&method.method.parameters)?,
            body: converter.body(method.body)?,
        };
        WrapperSplit {
            owning_class,
            sequence_type: &self.types.sync_sequence,
            async_impl: false,
        }
        .apply(method, self.naming, parts)
    }

    fn rewrite_getter(&self, getter: &AccessorDecl, _owning_class: &str) -> Result<Vec<Member>, CodegenError> {
        let name = printable_name(&getter.name)?;
        let Some(body) = &getter.body else {
            return Err(CodegenError::AccessorWithoutBody { accessor: name });
        };
        let Some((annotation, return_type)) = getter
            .return_type
            .as_ref()
            .and_then(|annotation| annotation.ty.as_reference().map(|reference| (annotation, reference)))
            .filter(|(_, reference)| !reference.is_qualified())
        else {
            return Err(CodegenError::AccessorReturnType { accessor: name });
        };
        let converter = SyncConverter::new(self.types, &name);

        let mut converted = getter.clone();
        converted.decorators.clear();
        converted.modifiers = split::without_modifier(&getter.modifiers, "async");
        converted.name = converter.name(&getter.name)?;
        converted.parameters = converter.parameters(&getter.parameters)?;
        converted.return_type = Some(TypeAnnotation {
            colon: annotation.colon.clone(),
            ty: converter.return_type(return_type)?,
        });
        converted.body = Some(converter.body(body)?);
        split::normalize_accessor_header(&mut converted);
        Ok(vec![Member::Getter(converted)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linqgen::ast::{Node, PropertyName};
    use crate::linqgen::formats::ToSource;
    use crate::linqgen::parsing::parse_source;

    fn rewrite(member: &str) -> Result<String, CodegenError> {
        let source = format!("class EnumerableTemplate<T> {{\n    {}\n}}\n", member);
        let file = parse_source("implementationTemplate.ts", &source).unwrap();
        let Node::Class(class) = &file.nodes[0] else {
            panic!("expected a class");
        };
        let naming = NamingConvention::default();
        let types = TypeMapping::default();
        let rewriter = SynchronousRewriter::new(&naming, &types);
        let generated = match &class.members()[0] {
            Member::Method(method) => rewriter.rewrite_method(method, "Enumerable")?,
            Member::Getter(getter) => rewriter.rewrite_getter(getter, "Enumerable")?,
            Member::Other(_) => panic!("expected a method or getter"),
        };
        Ok(generated.iter().map(ToSource::to_source).collect())
    }

    #[test]
    fn test_aggregate() {
        assert_eq!(
            rewrite("public async count(predicate?: (e: T) => AsyncOrSync<boolean>): Promise<number> {\n        let n = 0;\n        for await (const e of this) {\n            if (!predicate || await predicate(e)) { n++; }\n        }\n        return n;\n    }")
                .unwrap(),
            "\n    public count(predicate?: (e: T) => boolean): number {\n        let n = 0;\n        for (const e of this) {\n            if (!predicate || predicate(e)) { n++; }\n        }\n        return n;\n    }"
        );
    }

    #[test]
    fn test_stream_keeps_generator() {
        assert_eq!(
            rewrite("public async *select<R>(f: (e: T) => AsyncOrSync<R>): AsyncIterable<R> {\n        for await (const e of this) { yield await f(e); }\n    }")
                .unwrap(),
            "\n    public *select<R>(f: (e: T) => R): Iterable<R> {\n        for (const e of this) { yield f(e); }\n    }"
        );
    }

    #[test]
    fn test_async_iterator_method() {
        assert_eq!(
            rewrite("public [Symbol.asyncIterator](): AsyncIterator<T> {\n        return this.iterable[Symbol.asyncIterator]();\n    }")
                .unwrap(),
            "\n    public [Symbol.iterator](): Iterator<T> {\n        return this.iterable[Symbol.iterator]();\n    }"
        );
    }

    #[test]
    fn test_wrapped_stream() {
        let output = rewrite(
            "@enumerableWrapper\n    public async *append(element: T): AsyncIterable<T> {\n        yield* this;\n        yield element;\n    }",
        )
        .unwrap();
        assert_eq!(
            output,
            "\n    public append(element: T): Enumerable<T> {\n        return new Enumerable(this.appendImpl(element));\n    }\n    private *appendImpl(element: T): Iterable<T> {\n        yield* this;\n        yield element;\n    }"
        );
    }

    #[test]
    fn test_wrapped_stream_forwards_rest_parameters() {
        let output = rewrite(
            "public async *concat(...others: AsyncOrSyncIterable<T>[]): WrapWithAsyncEnumerable<T> {\n        yield* this;\n    }",
        )
        .unwrap();
        assert!(output.contains("public concat(...others: Iterable<T>[]): Enumerable<T> {"));
        assert!(output.contains("return new Enumerable(this.concatImpl(...others));"));
        assert!(output.contains("private *concatImpl(...others: Iterable<T>[]): Iterable<T> {"));
    }

    #[test]
    fn test_type_parameters_are_converted_in_both_stream_paths() {
        let wrapped = rewrite(
            "public async *scan<R = AsyncOrSync<T>>(seed: R): WrapWithAsyncEnumerable<R> {\n        yield seed;\n    }",
        )
        .unwrap();
        assert!(wrapped.contains("public scan<R = T>(seed: R): Enumerable<R> {"));
        assert!(wrapped.contains("private *scanImpl<R = T>(seed: R): Iterable<R> {"));
        assert!(!wrapped.contains("AsyncOrSync"));

        let plain = rewrite(
            "public async *scan<R = AsyncOrSync<T>>(seed: R): AsyncIterable<R> {\n        yield seed;\n    }",
        )
        .unwrap();
        assert!(plain.contains("public *scan<R = T>(seed: R): Iterable<R> {"));
    }

    #[test]
    fn test_wrapped_stream_requires_identifiers() {
        assert_eq!(
            rewrite("public async *[Symbol.iterator](): WrapWithAsyncEnumerable<T> { }"),
            Err(CodegenError::NonIdentifierMethodName {
                method: "[Symbol.iterator]".into()
            })
        );
        assert_eq!(
            rewrite("public async *zip({ a }: P): WrapWithAsyncEnumerable<T> { }"),
            Err(CodegenError::NonIdentifierParameter { method: "zip".into() })
        );
    }

    #[test]
    fn test_getter() {
        assert_eq!(
            rewrite("public get first(): Promise<T> { return this.firstImpl(); }").unwrap(),
            "\n    public get first(): T { return this.firstImpl(); }"
        );
        assert_eq!(
            rewrite("get items(): T[] { return []; }"),
            Err(CodegenError::AccessorReturnType { accessor: "items".into() })
        );
    }

    #[test]
    fn test_decorators_never_reach_the_output() {
        let output = rewrite("@enumerableWrapper\n    public async *skip(n: number): AsyncIterable<T> { }").unwrap();
        assert!(!output.contains('@'));
        let file = parse_source("t.ts", &format!("class A {{{}\n}}", output)).unwrap();
        let Node::Class(class) = &file.nodes[0] else {
            panic!("expected a class");
        };
        let Member::Method(wrapper) = &class.members()[0] else {
            panic!("expected a method");
        };
        assert!(matches!(&wrapper.name, PropertyName::Identifier(name) if name.text == "skip"));
    }
}
