//! Emission of generated files
//!
//! A generated tree becomes the banner followed by the printed tree, written to the output
//! directory under the skeleton's base name. Rendering and writing are separate steps so
//! nothing touches the disk until every output exists.

use crate::linqgen::ast::SourceFile;
use crate::linqgen::config::GeneratorConfig;
use crate::linqgen::error::Error;
use crate::linqgen::formats::print_file;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

pub fn render(file: &SourceFile, config: &GeneratorConfig) -> GeneratedFile {
    GeneratedFile {
        path: config.output_dir.join(file.base_name()),
        contents: format!("{}{}", config.banner, print_file(file)),
    }
}

/// Write every file, creating the output directory when needed
pub fn write_all(files: &[GeneratedFile]) -> Result<(), Error> {
    for file in files {
        let write_error = |source| Error::Write {
            path: file.path.clone(),
            source,
        };
        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(&file.path, &file.contents).map_err(write_error)?;
        info!(path = %file.path.display(), bytes = file.contents.len(), "wrote generated file");
    }
    Ok(())
}
