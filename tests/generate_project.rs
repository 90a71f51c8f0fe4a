//! End-to-end generation over a small template project

use linqgen::linqgen::codegen::CodegenError;
use linqgen::linqgen::config::GeneratorConfig;
use linqgen::linqgen::error::Error;
use linqgen::linqgen::processor;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TSCONFIG: &str = include_str!("fixtures/project/template/tsconfig.json");
const TEMPLATE: &str = include_str!("fixtures/project/template/implementationTemplate.ts");
const ENUMERABLE: &str = include_str!("fixtures/project/template/enumerable.ts");
const ASYNC_ENUMERABLE: &str = include_str!("fixtures/project/template/asyncEnumerable.ts");

/// Lay out the fixture project under a fresh directory
fn project(template: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let template_dir = dir.path().join("template");
    fs::create_dir_all(&template_dir).unwrap();
    fs::write(template_dir.join("tsconfig.json"), TSCONFIG).unwrap();
    fs::write(template_dir.join("implementationTemplate.ts"), template).unwrap();
    fs::write(template_dir.join("enumerable.ts"), ENUMERABLE).unwrap();
    fs::write(template_dir.join("asyncEnumerable.ts"), ASYNC_ENUMERABLE).unwrap();
    dir
}

fn read_output(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join("src").join(name)).unwrap()
}

#[test]
fn test_writes_both_outputs() {
    let dir = project(TEMPLATE);
    let config = GeneratorConfig::for_project(dir.path());
    let written = processor::run(&config).unwrap();

    assert_eq!(
        written,
        vec![
            dir.path().join("src/enumerable.ts"),
            dir.path().join("src/asyncEnumerable.ts"),
        ]
    );
    for name in ["enumerable.ts", "asyncEnumerable.ts"] {
        let output = read_output(dir.path(), name);
        assert!(output.starts_with(&config.banner), "{} lacks the banner", name);
    }
}

#[test]
fn test_synchronous_output() {
    let dir = project(TEMPLATE);
    processor::run(&GeneratorConfig::for_project(dir.path())).unwrap();
    let output = read_output(dir.path(), "enumerable.ts");

    // the skeleton is kept as written
    assert!(output.contains(
        "/**\n * Synchronous sequence with **LINQ** operators.\n */\nexport class Enumerable<T> implements Iterable<T> {\n\n    /** The wrapped source. */\n"
    ));
    assert!(output.contains("        return new Enumerable(text.split(/[,;(]\\s*/));\n"));
    assert!(output.contains(
        "    [Symbol.iterator](): Iterator<T> {\n        return this.iterable[Symbol.iterator]();\n    }\n\n    public all("
    ));

    assert!(output.contains(
        "    public all(predicate: (element: T) => boolean): boolean {\n        for (const element of this.iterable) {\n            if (!predicate(element)) {\n                return false;\n            }\n        }\n        return true;\n    }"
    ));
    assert!(output.contains(
        "    public append(element: T): Enumerable<T> {\n        return new Enumerable(this.appendImpl(element));\n    }\n    private *appendImpl(element: T): Iterable<T> {\n        yield* this.iterable;\n        yield element;\n    }"
    ));
    assert!(output.contains(
        "    public concat(secondHalf: Iterable<T>): Enumerable<T> {\n        return new Enumerable(this.concatImpl(secondHalf));\n    }\n    private *concatImpl(secondHalf: Iterable<T>): Iterable<T> {"
    ));
    assert!(output.contains(
        "    public first(predicate?: (element: T) => boolean): T {\n        for (const element of this.iterable) {\n            if (!predicate || predicate(element)) {"
    ));
    assert!(output.contains(
        "    public select<TResult>(selector: (element: T, index: number) => TResult): Enumerable<TResult> {\n        return new Enumerable(this.selectImpl(selector));\n    }\n    private *selectImpl<TResult>(selector: (element: T, index: number) => TResult): Iterable<TResult> {\n        let index = 0;\n        for (const element of this.iterable) {\n            yield selector(element, index++);\n        }\n    }"
    ));
    assert!(output.contains(
        "    public *where(predicate: (element: T) => boolean): Iterable<T> {\n        for (const element of this.iterable) {\n            if (predicate(element)) {\n                yield element;\n            }\n        }\n    }\n}\n"
    ));

    assert!(output.contains(
        "    /**\n     * Returns the first element satisfying the predicate.\n     */\n    public first("
    ));
    assert!(output.contains(
        "    /** Projects each element, **lazily**. */\n    public select<TResult>("
    ));
    assert!(output.contains("    /** @override */\n    public append(element: T): Enumerable<T> {"));
    assert!(output.contains(
        "    public toText(format: (element: T) => string): string {\n        const parts: string[] = [];\n        for (const element of this.iterable) {\n            parts.push(`[${format(element)}]`);\n        }\n        return parts.join(\", \").replace(/[\\[\\]{}(]/g, \"\");\n    }"
    ));

    for leftover in ["await", "async ", "AsyncOrSync", "@enumerableWrapper", "Promise"] {
        assert!(!output.contains(leftover), "synchronous output contains {}", leftover);
    }
}

#[test]
fn test_asynchronous_output() {
    let dir = project(TEMPLATE);
    processor::run(&GeneratorConfig::for_project(dir.path())).unwrap();
    let output = read_output(dir.path(), "asyncEnumerable.ts");

    assert!(output.contains(
        "    public async all(predicate: (element: T) => AsyncOrSync<boolean>): Promise<boolean> {\n        for await (const element of this.iterable) {\n            if (!await predicate(element)) {"
    ));
    assert!(output.contains(
        "    public append(element: T): AsyncEnumerable<T> {\n        return new AsyncEnumerable(this.appendImpl(element));\n    }\n    private async *appendImpl(element: T): AsyncIterable<T> {\n        yield* this.iterable;\n        yield element;\n    }"
    ));
    assert!(output.contains(
        "    public select<TResult>(selector: (element: T, index: number) => AsyncOrSync<TResult>): AsyncEnumerable<TResult> {\n        return new AsyncEnumerable(this.selectImpl(selector));\n    }\n    private async *selectImpl<TResult>(selector: (element: T, index: number) => AsyncOrSync<TResult>): AsyncIterable<TResult> {\n        let index = 0;\n        for await (const element of this.iterable) {\n            yield await selector(element, index++);"
    ));
    assert!(output.contains(
        "    public async *where(predicate: (element: T) => AsyncOrSync<boolean>): AsyncIterable<T> {"
    ));
    assert!(output.contains(
        "    public async toText(format: (element: T) => AsyncOrSync<string>): Promise<string> {\n        const parts: string[] = [];\n        for await (const element of this.iterable) {\n            parts.push(`[${await format(element)}]`);"
    ));
    assert!(output.contains("    /** Projects each element, **lazily**. */\n    public select<TResult>("));
    assert!(!output.contains("@enumerableWrapper"));
}

#[test]
fn test_generate_does_not_write() {
    let dir = project(TEMPLATE);
    let outputs = processor::generate(&GeneratorConfig::for_project(dir.path())).unwrap();
    assert_eq!(outputs.len(), 2);
    assert!(!dir.path().join("src").exists());
}

#[test]
fn test_one_bad_member_writes_nothing() {
    let bad_member = "\n    public foo(): Bar<T> {\n        return this.bar;\n    }\n}\n";
    let template = format!(
        "{}{}",
        TEMPLATE.trim_end().strip_suffix('}').unwrap(),
        bad_member
    );
    let dir = project(&template);

    let error = processor::run(&GeneratorConfig::for_project(dir.path())).unwrap_err();
    assert!(matches!(
        &error,
        Error::Codegen(CodegenError::UnknownReturnType { method, identifier })
            if method == "foo" && identifier == "Bar"
    ));
    assert_eq!(
        error.to_string(),
        "Implementation method foo() has unknown return type Bar."
    );
    assert!(!dir.path().join("src").exists());
}

#[test]
fn test_missing_template_file() {
    let dir = project(TEMPLATE);
    fs::remove_file(dir.path().join("template/implementationTemplate.ts")).unwrap();
    let error = processor::run(&GeneratorConfig::for_project(dir.path())).unwrap_err();
    assert!(matches!(&error, Error::SourceNotFound(name) if name == "implementationTemplate.ts"));
}

#[test]
fn test_unbalanced_skeleton_is_a_parse_error() {
    let dir = project(TEMPLATE);
    fs::write(
        dir.path().join("template/enumerable.ts"),
        "export class Enumerable<T> {\n    m() {\n}\n",
    )
    .unwrap();
    let error = processor::run(&GeneratorConfig::for_project(dir.path())).unwrap_err();
    assert!(matches!(error, Error::Parse(_)));
    assert!(!dir.path().join("src").exists());
}
