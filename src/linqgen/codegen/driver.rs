//! Generation driver
//!
//! Walks a skeleton file and expands every target class with the rewritten members of its
//! template class. Target classes keep their own members; the generated ones are appended
//! after them, in template order. Everything else in the skeleton is left untouched.

use super::{AsynchronousRewriter, CodegenError, Flavor, MemberRewriter, SynchronousRewriter};
use crate::linqgen::ast::{query, ClassDecl, Member, Node, SourceFile};
use crate::linqgen::config::{GeneratorConfig, NamingConvention};
use std::collections::HashMap;
use tracing::debug;

/// Template classes by name
#[derive(Debug, Clone, Default)]
pub struct TemplateIndex {
    classes: HashMap<String, ClassDecl>,
}

impl TemplateIndex {
    /// Index the top-level classes of the template file
    ///
    /// Every template class must be named, and names must be unique.
    pub fn build(template: &SourceFile) -> Result<Self, CodegenError> {
        let mut classes = HashMap::new();
        for class in query::class_declarations(template) {
            let Some(name) = class.name_text() else {
                return Err(CodegenError::AnonymousTemplateClass {
                    file: template.file_name.clone(),
                });
            };
            if classes.insert(name.to_string(), class.clone()).is_some() {
                return Err(CodegenError::DuplicateTemplateClass {
                    name: name.to_string(),
                });
            }
        }
        debug!(file = %template.file_name, classes = classes.len(), "indexed template classes");
        Ok(Self { classes })
    }

    pub fn get(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Expands the target classes of one skeleton file
pub struct Generator<'a> {
    flavor: Flavor,
    index: &'a TemplateIndex,
    naming: &'a NamingConvention,
    rewriter: Box<dyn MemberRewriter + 'a>,
}

impl<'a> Generator<'a> {
    pub fn new(flavor: Flavor, index: &'a TemplateIndex, config: &'a GeneratorConfig) -> Self {
        let rewriter: Box<dyn MemberRewriter + 'a> = match flavor {
            Flavor::Synchronous => Box::new(SynchronousRewriter::new(&config.naming, &config.types)),
            Flavor::Asynchronous => Box::new(AsynchronousRewriter::new(&config.naming, &config.types)),
        };
        Self {
            flavor,
            index,
            naming: &config.naming,
            rewriter,
        }
    }

    pub fn generate(&self, skeleton: &SourceFile) -> Result<SourceFile, CodegenError> {
        let nodes = self.visit_nodes(&skeleton.nodes, &skeleton.file_name)?;
        Ok(skeleton.with_nodes(nodes))
    }

    fn visit_nodes(&self, nodes: &[Node], file: &str) -> Result<Vec<Node>, CodegenError> {
        nodes.iter().map(|node| self.visit_node(node, file)).collect()
    }

    fn visit_node(&self, node: &Node, file: &str) -> Result<Node, CodegenError> {
        match node {
            Node::Class(class) if !class.is_expression => {
                let Some(name) = class.name_text() else {
                    return Err(CodegenError::AnonymousClass {
                        file: file.to_string(),
                    });
                };
                if self.naming.is_target(name) {
                    Ok(Node::Class(self.expand(class, name)?))
                } else {
                    Ok(node.clone())
                }
            }
            Node::Group(group) => Ok(Node::Group(
                group.with_children(self.visit_nodes(&group.children, file)?),
            )),
            other => Ok(other.clone()),
        }
    }

    fn expand(&self, class: &ClassDecl, name: &str) -> Result<ClassDecl, CodegenError> {
        let template_name = self.naming.template_class_name(name, self.flavor)?;
        let template = self
            .index
            .get(&template_name)
            .ok_or_else(|| CodegenError::TemplateClassNotFound {
                expected: template_name.clone(),
                target: name.to_string(),
            })?;

        let mut members = class.members().to_vec();
        for member in template.members() {
            let generated = match member {
                Member::Method(method) => self.rewriter.rewrite_method(method, name)?,
                Member::Getter(getter) => self.rewriter.rewrite_getter(getter, name)?,
                Member::Other(_) => continue,
            };
            debug!(class = name, generated = generated.len(), "rewrote template member");
            members.extend(generated);
        }
        debug!(
            class = name,
            template = %template_name,
            flavor = %self.flavor,
            members = members.len() - class.members().len(),
            "expanded class"
        );
        Ok(class.with_members(members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linqgen::formats::print_file;
    use crate::linqgen::parsing::parse_source;

    const TEMPLATE: &str = "import { AsyncEnumerable } from './asyncEnumerable';

export abstract class EnumerableTemplate<T> {
    private readonly source: AsyncIterable<T>;

    public async count(): Promise<number> {
        let n = 0;
        for await (const _ of this) { n++; }
        return n;
    }

    @enumerableWrapper
    public async *skip(n: number): AsyncIterable<T> {
        for await (const e of this) { if (n-- <= 0) { yield e; } }
    }
}
";

    fn generate(flavor: Flavor, skeleton: &str) -> Result<String, CodegenError> {
        let config = GeneratorConfig::for_project("/project");
        let template = parse_source("implementationTemplate.ts", TEMPLATE).unwrap();
        let index = TemplateIndex::build(&template)?;
        let skeleton = parse_source("enumerable.ts", skeleton).unwrap();
        let generator = Generator::new(flavor, &index, &config);
        generator.generate(&skeleton).map(|file| print_file(&file))
    }

    #[test]
    fn test_index_rejects_anonymous_and_duplicate_classes() {
        let template = parse_source("t.ts", "export default class {}\n").unwrap();
        assert_eq!(
            TemplateIndex::build(&template).unwrap_err(),
            CodegenError::AnonymousTemplateClass { file: "t.ts".into() }
        );
        let template = parse_source("t.ts", "class A {}\nclass A {}\n").unwrap();
        assert_eq!(
            TemplateIndex::build(&template).unwrap_err(),
            CodegenError::DuplicateTemplateClass { name: "A".into() }
        );
        let template = parse_source("t.ts", "class A {}\nconst b = class {};\n").unwrap();
        assert_eq!(TemplateIndex::build(&template).unwrap().len(), 1);
    }

    #[test]
    fn test_synchronous_expansion() {
        let output = generate(
            Flavor::Synchronous,
            "export class Enumerable<T> {\n    constructor(private iterable: Iterable<T>) {}\n}\n",
        )
        .unwrap();
        assert_eq!(
            output,
            "export class Enumerable<T> {\n    constructor(private iterable: Iterable<T>) {}\n\n    public count(): number {\n        let n = 0;\n        for (const _ of this) { n++; }\n        return n;\n    }\n\n    public skip(n: number): Enumerable<T> {\n        return new Enumerable(this.skipImpl(n));\n    }\n    private *skipImpl(n: number): Iterable<T> {\n        for (const e of this) { if (n-- <= 0) { yield e; } }\n    }\n}\n"
        );
    }

    #[test]
    fn test_asynchronous_expansion() {
        let output = generate(
            Flavor::Asynchronous,
            "export class AsyncEnumerable<T> {\n}\n",
        )
        .unwrap();
        assert!(output.contains("    public async count(): Promise<number> {\n        let n = 0;\n        for await (const _ of this) { n++; }"));
        assert!(output.contains("    public skip(n: number): AsyncEnumerable<T> {\n        return new AsyncEnumerable(this.skipImpl(n));\n    }"));
        assert!(output.contains("    private async *skipImpl(n: number): AsyncIterable<T> {"));
        assert!(!output.contains("readonly source"));
    }

    #[test]
    fn test_non_targets_are_untouched() {
        let skeleton = "class Helper {\n    m() { await x; }\n}\nconst E = class Enumerable {};\nfunction f() {\n    class Local {}\n}\n";
        assert_eq!(generate(Flavor::Synchronous, skeleton).unwrap(), skeleton);
    }

    #[test]
    fn test_nested_targets_are_expanded() {
        let output = generate(Flavor::Synchronous, "namespace N {\n    export class Enumerable<T> {}\n}\n").unwrap();
        assert!(output.contains("public count(): number"));
    }

    #[test]
    fn test_driver_errors() {
        assert_eq!(
            generate(Flavor::Synchronous, "export default class {}\n"),
            Err(CodegenError::AnonymousClass { file: "enumerable.ts".into() })
        );
        assert_eq!(
            generate(Flavor::Synchronous, "class OrderedEnumerable {}\n"),
            Err(CodegenError::TemplateClassNotFound {
                expected: "OrderedEnumerableTemplate".into(),
                target: "OrderedEnumerable".into()
            })
        );
        assert_eq!(
            generate(Flavor::Asynchronous, "class Enumerable {}\n"),
            Err(CodegenError::NamingConvention {
                class: "Enumerable".into(),
                prefix: "Async".into()
            })
        );
    }
}
