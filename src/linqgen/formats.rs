//! Output formats for syntax trees
//!
//! This module contains the serialization of syntax trees back to TypeScript source:
//! - Trees and tree fragments to source text (printer)

pub mod printer;

pub use printer::{print_file, ToSource};
