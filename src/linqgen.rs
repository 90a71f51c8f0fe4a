//! Main module for linqgen library functionality

pub mod ast;
pub mod codegen;
pub mod config;
pub mod emission;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod processor;
pub mod project;
pub mod token;
