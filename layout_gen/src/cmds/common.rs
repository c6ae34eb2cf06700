/* Common utilities shared between analyze and codegen commands */

use anyhow::Context;
use layout_gen::config::GeneratorConfig;
use layout_gen::error::Diagnostic;
use layout_gen::layout::TypeRegistry;
use std::path::{Path, PathBuf};

/* Load and merge every input document */
pub fn load_registry(files: &[PathBuf], verbose: bool) -> anyhow::Result<TypeRegistry> {
  if verbose {
    println!("[~] Loading {} schema document(s)...", files.len());
    for file in files {
      println!("    - {}", file.display());
    }
  }

  let registry = TypeRegistry::load_files(files)?;

  if verbose {
    println!("[~] Loaded {} type definitions", registry.len());
    for (name, def) in registry.iter() {
      println!("  - {} ({:?})", name, def.kind());
    }
    println!();
  }

  Ok(registry)
}

/* Resolve the generator config: file first, then command line overrides */
pub fn load_config(
  config_path: Option<&Path>,
  types_headers: Vec<String>,
  json_header: Option<String>,
) -> anyhow::Result<GeneratorConfig> {
  let mut config = match config_path {
    Some(path) => GeneratorConfig::load(path)?,
    None => GeneratorConfig::default(),
  };

  if !types_headers.is_empty() {
    config.types_headers = types_headers;
  }
  if let Some(json_header) = json_header {
    config.json_header = json_header;
  }

  config
    .validate()
    .map_err(|message| anyhow::anyhow!(message))
    .context("invalid generator options")?;

  Ok(config)
}

pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
  if diagnostics.is_empty() {
    println!("[✓] All fields supported");
    return;
  }

  println!("[!] {} unsupported field(s):", diagnostics.len());
  for diagnostic in diagnostics {
    println!("  [!] {}", diagnostic);
  }
}
