/* Codegen command - generate cJSON helpers from layout schema documents */

use super::common::{load_config, print_diagnostics};
use layout_gen::{generate, GenerationRequest};
use std::path::PathBuf;

pub struct CodegenArgs {
  pub files: Vec<PathBuf>,
  pub roots: Vec<String>,
  pub out_base: PathBuf,
  pub config: Option<PathBuf>,
  pub types_headers: Vec<String>,
  pub json_header: Option<String>,
  pub verbose: bool,
}

/* Execute the codegen command */
pub fn run(args: CodegenArgs) -> anyhow::Result<()> {
  let config = load_config(args.config.as_deref(), args.types_headers, args.json_header)?;

  if args.verbose {
    println!("Layout Generator - Code Generation Tool");
    println!("=======================================\n");
    println!("[~] Configuration:");
    println!("  Output base: {}", args.out_base.display());
    if args.roots.is_empty() {
      println!("  Roots: (sole struct)");
    } else {
      println!("  Roots: {}", args.roots.join(", "));
    }
    println!("  Types headers: {}", config.types_headers.join(", "));
    println!("  JSON header: {}", config.json_header);
    println!("  Input files: {}", args.files.len());
    for file in &args.files {
      println!("    - {}", file.display());
    }
    println!();
  }

  let request = GenerationRequest {
    inputs: args.files,
    roots: args.roots,
    out_base: args.out_base,
    config,
  };
  let report = generate(&request)?;

  if args.verbose {
    println!("[~] Definition order: {}", report.order.join(" -> "));
  }
  print_diagnostics(&report.diagnostics);
  println!(
    "[✓] Generated {} and {} for {}",
    report.header_path.display(),
    report.source_path.display(),
    report.roots.join(", ")
  );

  Ok(())
}
