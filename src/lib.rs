//! # linqgen
//!
//! Generates the synchronous and asynchronous enumerable classes of a LINQ-style
//! TypeScript library from a single template class.
//!
//! The pipeline is lexing, parsing, rewriting the template members, then printing. See
//! [linqgen::processor] for a whole run and [linqgen::codegen] for the rewrite rules.

pub mod linqgen;
