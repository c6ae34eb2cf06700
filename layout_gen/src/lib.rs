//! Generates cJSON serialize, deserialize and equality functions for C
//! structs described by layout schema documents.

pub mod codegen;
pub mod config;
pub mod dependency;
pub mod error;
pub mod layout;

use codegen::{write_artifacts, CCodeGenerator, CCodeGeneratorOptions, GeneratedArtifacts};
use config::GeneratorConfig;
use error::{Diagnostic, GenError};
use layout::{RootSet, TypeRegistry};
use std::path::PathBuf;
use tracing::info;

pub use codegen::DEFAULT_OUT_BASE;

/// One generation run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub inputs: Vec<PathBuf>,
    /// Empty means "the only struct in the inputs"
    pub roots: Vec<String>,
    /// Artifacts are `<out_base>.h` and `<out_base>.c`
    pub out_base: PathBuf,
    pub config: GeneratorConfig,
}

impl GenerationRequest {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            roots: Vec::new(),
            out_base: PathBuf::from(DEFAULT_OUT_BASE),
            config: GeneratorConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub header_path: PathBuf,
    pub source_path: PathBuf,
    pub roots: Vec<String>,
    pub order: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Load, validate, generate and write. Files are only touched once every
/// earlier step has succeeded.
pub fn generate(request: &GenerationRequest) -> Result<GenerationReport, GenError> {
    let registry = TypeRegistry::load_files(&request.inputs)?;
    info!(documents = request.inputs.len(), types = registry.len(), "merged schema documents");

    let roots = RootSet::resolve(&request.roots, &registry)?;
    let header_name = header_file_name(&request.out_base);
    let artifacts = generate_artifacts(&registry, &roots, &header_name, &request.config)?;

    let (header_path, source_path) = write_artifacts(&request.out_base, &artifacts)?;

    Ok(GenerationReport {
        header_path,
        source_path,
        roots: roots.names().to_vec(),
        order: artifacts.order,
        diagnostics: artifacts.diagnostics,
    })
}

/// Pure text generation over an already merged registry.
pub fn generate_artifacts(
    registry: &TypeRegistry,
    roots: &RootSet,
    header_name: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedArtifacts, GenError> {
    let options = CCodeGeneratorOptions { header_name: header_name.to_string(), config };
    CCodeGenerator::new(registry, options).emit_code(roots)
}

/* The source unit includes its header by file name only */
fn header_file_name(out_base: &std::path::Path) -> String {
    let (header, _) = codegen::artifact_paths(out_base);
    header
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.h", DEFAULT_OUT_BASE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_header_file_name_drops_directories() {
        assert_eq!(header_file_name(Path::new("out/dir/api")), "api.h");
        assert_eq!(header_file_name(Path::new("generated_json")), "generated_json.h");
    }
}
