//! The generator run
//!
//!     1. load the project and parse the template file once,
//!     2. index the template classes,
//!     3. expand the synchronous and the asynchronous skeletons,
//!     4. write both outputs.
//!
//!     Any failure in steps 1 to 3 aborts the run before anything is written.

use crate::linqgen::codegen::{Flavor, Generator, TemplateIndex};
use crate::linqgen::config::GeneratorConfig;
use crate::linqgen::emission::{self, GeneratedFile};
use crate::linqgen::error::Error;
use crate::linqgen::project::Project;
use std::path::PathBuf;
use tracing::debug;

/// Generate both outputs in memory
pub fn generate(config: &GeneratorConfig) -> Result<Vec<GeneratedFile>, Error> {
    let project = Project::load(&config.template_dir)?;
    let template = project.read_source(&config.template_file)?;
    let index = TemplateIndex::build(&template)?;

    let skeletons = [
        (Flavor::Synchronous, &config.synchronous_file),
        (Flavor::Asynchronous, &config.asynchronous_file),
    ];
    let mut outputs = Vec::with_capacity(skeletons.len());
    for (flavor, file_name) in skeletons {
        let skeleton = project.read_source(file_name)?;
        debug!(file = %skeleton.file_name, %flavor, "generating");
        let generated = Generator::new(flavor, &index, config).generate(&skeleton)?;
        outputs.push(emission::render(&generated, config));
    }
    Ok(outputs)
}

/// Generate and write both outputs, returning the written paths
pub fn run(config: &GeneratorConfig) -> Result<Vec<PathBuf>, Error> {
    let outputs = generate(config)?;
    emission::write_all(&outputs)?;
    Ok(outputs.into_iter().map(|output| output.path).collect())
}
