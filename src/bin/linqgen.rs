//! Command-line interface for linqgen
//! Expands the template class of a project into its synchronous and asynchronous classes.
//!
//! Usage:
//!   linqgen [ROOT]   - Generate `<ROOT>/src/enumerable.ts` and `<ROOT>/src/asyncEnumerable.ts`
//!
//! Log output goes to stderr and is filtered with `RUST_LOG` (default `info`).

use clap::{Arg, Command};
use linqgen::linqgen::config::GeneratorConfig;
use linqgen::linqgen::processor;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("linqgen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates the enumerable classes from the implementation template")
        .arg(
            Arg::new("root")
                .help("Project root holding template/ and src/")
                .index(1)
                .default_value("."),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let root = matches
        .get_one::<String>("root")
        .map(String::as_str)
        .unwrap_or(".");
    let config = GeneratorConfig::for_project(root);

    match processor::run(&config) {
        Ok(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
