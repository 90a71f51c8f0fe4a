//! Project loading
//!
//!     The template sources are found the way the TypeScript compiler finds a program's
//!     root files: the nearest `tsconfig.json` at or above the template directory names
//!     them through `files`, `include` and `exclude`. Only the subset of tsconfig the
//!     generator needs is read; compiler options are ignored.
//!
//!     The file may contain comments and trailing commas, which are stripped before it
//!     is handed to serde_json.

use crate::linqgen::ast::SourceFile;
use crate::linqgen::error::Error;
use crate::linqgen::parsing::parse_source;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const CONFIG_FILE_NAME: &str = "tsconfig.json";

const DEFAULT_INCLUDE: &str = "**/*";
const SOURCE_EXTENSION: &str = "ts";
const SKIPPED_DIRECTORIES: &[&str] = &["node_modules"];

/// Strings (kept), line comments, block comments and trailing commas
static JSONC_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"("(?:[^"\\]|\\.)*")|//[^\n]*|/\*[\s\S]*?\*/|,(\s*[\]}])"#)
        .expect("JSONC noise pattern is valid")
});

/// The part of `tsconfig.json` that decides the root files
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    pub files: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl TsConfig {
    /// `include`, defaulting to everything unless `files` is given
    pub fn include_patterns(&self) -> Vec<String> {
        match (&self.include, &self.files) {
            (Some(include), _) => include.clone(),
            (None, Some(_)) => Vec::new(),
            (None, None) => vec![DEFAULT_INCLUDE.to_string()],
        }
    }
}

/// A loaded project: its config file and the root files it names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub config_file: PathBuf,
    pub root_files: Vec<PathBuf>,
}

impl Project {
    pub fn load(template_dir: &Path) -> Result<Self, Error> {
        let config_file =
            find_config_file(template_dir).ok_or_else(|| Error::ConfigNotFound(template_dir.to_path_buf()))?;
        let text = fs::read_to_string(&config_file).map_err(|source| Error::ConfigRead {
            path: config_file.clone(),
            source,
        })?;
        let config = parse_config(&text).map_err(|source| Error::ConfigInvalid {
            path: config_file.clone(),
            source,
        })?;
        let base = config_file
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let root_files = root_files(&config, base, &config_file)?;
        debug!(config = %config_file.display(), files = root_files.len(), "loaded project");
        Ok(Self {
            config_file,
            root_files,
        })
    }

    /// The first root file whose path ends with `suffix`
    pub fn find_root_file(&self, suffix: &str) -> Result<&Path, Error> {
        self.root_files
            .iter()
            .find(|path| path.to_string_lossy().ends_with(suffix))
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::SourceNotFound(suffix.to_string()))
    }

    /// Read and parse the root file ending with `suffix`
    pub fn read_source(&self, suffix: &str) -> Result<SourceFile, Error> {
        let path = self.find_root_file(suffix)?;
        let text = fs::read_to_string(path).map_err(|source| Error::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(parse_source(&path.to_string_lossy(), &text)?)
    }
}

/// Nearest `tsconfig.json` in `start` or one of its ancestors
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|directory| directory.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

pub fn parse_config(text: &str) -> Result<TsConfig, serde_json::Error> {
    serde_json::from_str(&strip_json_noise(text))
}

fn strip_json_noise(text: &str) -> String {
    // a comma followed by a comment is only trailing once the comment is gone
    let without_comments = JSONC_NOISE.replace_all(text, keep_strings);
    JSONC_NOISE.replace_all(&without_comments, keep_strings).into_owned()
}

fn keep_strings(captures: &Captures) -> String {
    if let Some(string) = captures.get(1) {
        string.as_str().to_string()
    } else if let Some(closing) = captures.get(2) {
        closing.as_str().to_string()
    } else {
        String::new()
    }
}

/// Root file names: `files` first, then the `.ts` files matched by `include` and not by
/// `exclude`, sorted and deduplicated
fn root_files(config: &TsConfig, base: &Path, config_file: &Path) -> Result<Vec<PathBuf>, Error> {
    let include = glob_set(&config.include_patterns(), base, config_file)?;
    let exclude = glob_set(&config.exclude, base, config_file)?;

    let mut files: Vec<PathBuf> = config
        .files
        .iter()
        .flatten()
        .map(|file| base.join(file.trim_start_matches("./")))
        .collect();

    let walker = WalkDir::new(base).into_iter().filter_entry(|entry| {
        !(entry.file_type().is_dir()
            && SKIPPED_DIRECTORIES
                .iter()
                .any(|skipped| entry.file_name() == *skipped))
    });
    for entry in walker.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != SOURCE_EXTENSION) {
            continue;
        }
        let Ok(relative) = path.strip_prefix(base) else {
            continue;
        };
        if include.is_match(relative) && !exclude.is_match(relative) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn glob_set(patterns: &[String], base: &Path, config_file: &Path) -> Result<GlobSet, Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let normalized = normalize_pattern(pattern, base);
        let glob = GlobBuilder::new(&normalized)
            .literal_separator(true)
            .build()
            .map_err(|source| Error::ConfigPattern {
                pattern: pattern.clone(),
                config: config_file.to_path_buf(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| Error::ConfigPattern {
        pattern: patterns.join(", "),
        config: config_file.to_path_buf(),
        source,
    })
}

/// Strip `./`, and let a plain directory stand for everything below it
fn normalize_pattern(pattern: &str, base: &Path) -> String {
    let pattern = pattern.trim_start_matches("./").trim_end_matches('/');
    let has_wildcard = pattern.contains(|c: char| c == '*' || c == '?');
    if !has_wildcard && base.join(pattern).is_dir() {
        format!("{}/**/*", pattern)
    } else {
        pattern.to_string()
    }
}
