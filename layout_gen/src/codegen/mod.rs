pub mod c;
pub mod c_gen;
pub mod output;

pub use c::{CCodeGenerator, CCodeGeneratorOptions, GeneratedArtifacts};
pub use output::{artifact_paths, write_artifacts};

/// Output basename used when none is given
pub const DEFAULT_OUT_BASE: &str = "generated_json";
