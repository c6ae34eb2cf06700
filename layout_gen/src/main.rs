use clap::{Parser, Subcommand};
use layout_gen::DEFAULT_OUT_BASE;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cmds;

#[derive(Parser)]
#[command(name = "layout-gen")]
#[command(about = "Generate cJSON serializers for C struct layouts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate <base>.h and <base>.c from layout schema documents */
    Codegen {
        /* Input JSON schema documents, merged in order */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /* Struct that gets public functions; repeat for several */
        #[arg(short = 'r', long = "root", value_name = "STRUCT")]
        roots: Vec<String>,

        /* Output basename; `.h` and `.c` are appended */
        #[arg(short = 'o', long = "out-base", value_name = "BASE", default_value = DEFAULT_OUT_BASE)]
        out_base: PathBuf,

        /* YAML generator configuration */
        #[arg(long = "config", value_name = "FILE")]
        config: Option<PathBuf>,

        /* Header declaring the native types; repeat for several */
        #[arg(long = "types-header", value_name = "HEADER")]
        types_headers: Vec<String>,

        /* Header providing the cJSON API */
        #[arg(long = "json-header", value_name = "HEADER")]
        json_header: Option<String>,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /* Show field categories, definition order and layout warnings */
    Analyze {
        /* Input JSON schema documents, merged in order */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /* Restrict the order to structs reachable from these roots */
        #[arg(short = 'r', long = "root", value_name = "STRUCT")]
        roots: Vec<String>,

        /* Print the report as JSON */
        #[arg(long = "json")]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Codegen {
            files,
            roots,
            out_base,
            config,
            types_headers,
            json_header,
            verbose,
        } => {
            init_tracing(verbose);
            cmds::codegen::run(cmds::codegen::CodegenArgs {
                files,
                roots,
                out_base,
                config,
                types_headers,
                json_header,
                verbose,
            })?;
        }

        Commands::Analyze { files, roots, json } => {
            init_tracing(false);
            cmds::analyze::run(files, roots, json)?;
        }
    }

    Ok(())
}
