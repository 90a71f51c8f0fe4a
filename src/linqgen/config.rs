//! Generator configuration
//!
//!     Everything that was a fixed constant of the generator lives here as plain data:
//!     where the template project is, where the output goes, which files play which role,
//!     how class names map onto each other and how asynchronous types map onto synchronous
//!     ones. The configuration is built once by the caller and passed by reference into the
//!     processor, the driver and emission; nothing reads it from global state.
//!
//!     [GeneratorConfig::for_project] gives the standard layout: `<root>/template` holds
//!     the `tsconfig.json` and the three source files, and the generated files go to
//!     `<root>/src`.

use crate::linqgen::codegen::{CodegenError, Flavor};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Banner written at the top of every generated file
pub const GENERATED_BANNER: &str = "//***********************************//
//    GENERATED FILE. DO NOT EDIT!   //
//***********************************//

";

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Directory the `tsconfig.json` search starts from
    pub template_dir: PathBuf,
    /// Directory the generated files are written to
    pub output_dir: PathBuf,
    /// File name suffix of the template source
    pub template_file: String,
    /// File name suffix of the synchronous skeleton
    pub synchronous_file: String,
    /// File name suffix of the asynchronous skeleton
    pub asynchronous_file: String,
    pub banner: String,
    pub naming: NamingConvention,
    pub types: TypeMapping,
}

impl GeneratorConfig {
    /// Standard layout for a project root
    pub fn for_project(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            template_dir: root.join("template"),
            output_dir: root.join("src"),
            template_file: "implementationTemplate.ts".to_string(),
            synchronous_file: "enumerable.ts".to_string(),
            asynchronous_file: "asyncEnumerable.ts".to_string(),
            banner: GENERATED_BANNER.to_string(),
            naming: NamingConvention::default(),
            types: TypeMapping::default(),
        }
    }
}

/// How skeleton class names, template class names and generated member names relate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    /// Skeleton classes whose name ends with this are expanded
    pub target_suffix: String,
    /// Prefix every asynchronous target class must carry
    pub async_prefix: String,
    /// Appended to a target name (prefix stripped) to name its template class
    pub template_suffix: String,
    /// Appended to a wrapped method's name to name its implementation method
    pub impl_suffix: String,
    /// Decorator marking methods that need a wrapper/impl split
    pub wrapper_marker: String,
    /// Return type alias that implies the marker
    pub wrapper_placeholder: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            target_suffix: "Enumerable".to_string(),
            async_prefix: "Async".to_string(),
            template_suffix: "Template".to_string(),
            impl_suffix: "Impl".to_string(),
            wrapper_marker: "enumerableWrapper".to_string(),
            wrapper_placeholder: "WrapWithAsyncEnumerable".to_string(),
        }
    }
}

impl NamingConvention {
    pub fn is_target(&self, class_name: &str) -> bool {
        class_name.ends_with(&self.target_suffix)
    }

    /// Name of the template class a target class is expanded from
    ///
    /// `Enumerable` maps to `EnumerableTemplate` for the synchronous flavour, and
    /// `AsyncEnumerable` maps to `EnumerableTemplate` for the asynchronous one. An
    /// asynchronous target without the prefix is rejected.
    pub fn template_class_name(&self, class_name: &str, flavor: Flavor) -> Result<String, CodegenError> {
        let base = match flavor {
            Flavor::Synchronous => class_name,
            Flavor::Asynchronous => class_name.strip_prefix(&self.async_prefix).ok_or_else(|| {
                CodegenError::NamingConvention {
                    class: class_name.to_string(),
                    prefix: self.async_prefix.clone(),
                }
            })?,
        };
        Ok(format!("{}{}", base, self.template_suffix))
    }

    pub fn impl_name(&self, method_name: &str) -> String {
        format!("{}{}", method_name, self.impl_suffix)
    }
}

/// Conversion applied to a method's return type in the synchronous output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnConversion {
    /// Replace the type with its only type argument (`Promise<T>` to `T`)
    Unwrap,
    /// Rename the type, keeping its arguments (`AsyncIterable<T>` to `Iterable<T>`)
    Rename(String),
}

/// Asynchronous to synchronous type correspondence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    /// Identifiers renamed wherever they appear in parameters and bodies
    pub renames: HashMap<String, String>,
    /// Type references replaced by their only type argument in parameters and bodies
    pub unwrapped: Vec<String>,
    /// Return types the synchronous output knows how to convert
    pub return_types: HashMap<String, ReturnConversion>,
    /// The synchronous sequence type an implementation method returns
    pub sync_sequence: String,
    /// The asynchronous sequence type an implementation method returns
    pub async_sequence: String,
}

static DEFAULT_TYPE_MAPPING: Lazy<TypeMapping> = Lazy::new(|| {
    let renames = [
        ("AsyncIterable", "Iterable"),
        ("AsyncSortedEnumerable", "SortedEnumerable"),
        ("AsyncOrSyncIterable", "Iterable"),
    ];
    let return_types = [
        ("Promise", ReturnConversion::Unwrap),
        ("AsyncIterable", ReturnConversion::Rename("Iterable".into())),
        ("AsyncIterator", ReturnConversion::Rename("Iterator".into())),
        (
            "AsyncSortedEnumerable",
            ReturnConversion::Rename("SortedEnumerable".into()),
        ),
    ];

    TypeMapping {
        renames: renames
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect(),
        unwrapped: vec!["AsyncOrSync".to_string()],
        return_types: return_types
            .into_iter()
            .map(|(from, conversion)| (from.to_string(), conversion))
            .collect(),
        sync_sequence: "Iterable".to_string(),
        async_sequence: "AsyncIterable".to_string(),
    }
});

impl Default for TypeMapping {
    fn default() -> Self {
        DEFAULT_TYPE_MAPPING.clone()
    }
}

impl TypeMapping {
    pub fn rename(&self, identifier: &str) -> Option<&str> {
        self.renames.get(identifier).map(String::as_str)
    }

    pub fn is_unwrapped(&self, identifier: &str) -> bool {
        self.unwrapped.iter().any(|name| name == identifier)
    }

    pub fn return_conversion(&self, identifier: &str) -> Option<&ReturnConversion> {
        self.return_types.get(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_layout() {
        let config = GeneratorConfig::for_project("/work/linq");
        assert_eq!(config.template_dir, PathBuf::from("/work/linq/template"));
        assert_eq!(config.output_dir, PathBuf::from("/work/linq/src"));
        assert!(config.banner.starts_with("//****"));
        assert!(config.banner.ends_with("//\n\n"));
    }

    #[test]
    fn test_template_class_names() {
        let naming = NamingConvention::default();
        assert_eq!(
            naming.template_class_name("Enumerable", Flavor::Synchronous).unwrap(),
            "EnumerableTemplate"
        );
        assert_eq!(
            naming.template_class_name("AsyncEnumerable", Flavor::Asynchronous).unwrap(),
            "EnumerableTemplate"
        );
        assert_eq!(
            naming.template_class_name("OrderedEnumerable", Flavor::Asynchronous),
            Err(CodegenError::NamingConvention {
                class: "OrderedEnumerable".into(),
                prefix: "Async".into(),
            })
        );
        assert!(naming.is_target("AsyncEnumerable"));
        assert!(!naming.is_target("EnumerableBase"));
        assert_eq!(naming.impl_name("where"), "whereImpl");
    }

    #[test]
    fn test_default_type_mapping() {
        let types = TypeMapping::default();
        assert_eq!(types.rename("AsyncOrSyncIterable"), Some("Iterable"));
        assert_eq!(types.rename("Iterable"), None);
        assert!(types.is_unwrapped("AsyncOrSync"));
        assert_eq!(types.return_conversion("Promise"), Some(&ReturnConversion::Unwrap));
        assert!(types.return_conversion("Bar").is_none());
    }
}
