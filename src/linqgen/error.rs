//! Errors of a generator run

use crate::linqgen::codegen::CodegenError;
use crate::linqgen::parsing::ParseError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tsconfig.json not found in {} or any parent directory.", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid project configuration {}: {source}", .path.display())]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid pattern {pattern} in {}: {source}", .config.display())]
    ConfigPattern {
        pattern: String,
        config: PathBuf,
        #[source]
        source: globset::Error,
    },
    #[error("Source file {0} not found.")]
    SourceNotFound(String),
    #[error("Failed to read source file {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
