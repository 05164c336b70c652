//! oatgen CLI - contract tests and k6 load scripts from an OpenAPI document

mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use oatgen_core::{Args, Config, Document, Plan, read_args};
use oatgen_emit::{emitters_for, generate};

#[derive(Parser)]
#[command(name = "oatgen")]
#[command(about = "Generate contract tests and k6 load scripts from an OpenAPI document")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: .oatgen.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate contract tests and load scripts
    ///
    /// Flags: --apiDocPath=<path> [--method=<m>] [--outputDir=<dir>] [--dryRun=true] [--output=json]
    Generate {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "--key=value")]
        args: Vec<String>,
    },

    /// Generate contract tests only
    Contract {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "--key=value")]
        args: Vec<String>,
    },

    /// Generate load scripts only
    Load {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "--key=value")]
        args: Vec<String>,
    },

    /// Initialize config file
    Init,

    /// Export JSON Schema for the dry-run plan format
    Schema,
}

/// Which emitters a generate-style command runs.
#[derive(Clone, Copy)]
enum Selection {
    Both,
    ContractOnly,
    LoadOnly,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let config_path = cli.config;
    match cli.command {
        Commands::Generate { args } => run_generate(&read_args(&args), config_path, Selection::Both),
        Commands::Contract { args } => {
            run_generate(&read_args(&args), config_path, Selection::ContractOnly)
        }
        Commands::Load { args } => run_generate(&read_args(&args), config_path, Selection::LoadOnly),

        Commands::Init => {
            let config_path = Config::CANDIDATES[0];
            if Path::new(config_path).exists() {
                eprintln!("{config_path} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {config_path}");
            println!("\nEdit the file to configure:");
            println!("  - output_dir: where generated files go");
            println!("  - methods: which HTTP methods to generate for");
            println!("  - [load] suffix / template: load script naming and skeleton");
            Ok(0)
        }

        Commands::Schema => {
            println!("{}", oatgen_core::plan::plan_schema());
            Ok(0)
        }
    }
}

fn run_generate(args: &Args, config_path: Option<PathBuf>, selection: Selection) -> Result<u8> {
    let Some(api_doc_path) = args.api_doc_path().filter(|p| p.exists()) else {
        println!("Please supply a valid path parameter for the openAPI document yaml");
        println!(
            " -> invalid path: {}",
            args.get(oatgen_core::args::API_DOC_PATH).unwrap_or("undefined")
        );
        return Ok(1);
    };

    let loaded = match config_path {
        Some(path) => Config::load(&path),
        None => Config::load_default(),
    };
    let mut config = match loaded {
        Ok(config) => config.with_args(args),
        Err(e) => {
            println!("{e}");
            return Ok(1);
        }
    };
    match selection {
        Selection::Both => {}
        Selection::ContractOnly => config.load.enabled = false,
        Selection::LoadOnly => config.contract.enabled = false,
    }

    let doc = match Document::load(&api_doc_path) {
        Ok(doc) => doc,
        Err(e) => {
            println!("{e}");
            return Ok(1);
        }
    };
    let plan = match Plan::build(&doc, &config) {
        Ok(plan) => plan,
        Err(e) => {
            println!("{e}");
            return Ok(1);
        }
    };

    if args.dry_run() {
        if args.json_output() {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            println!("{}", plan.to_terminal());
        }
        return Ok(0);
    }

    let api_doc_ref = api_doc_path.display().to_string();
    let emitters = match emitters_for(&plan, &config, &api_doc_ref) {
        Ok(emitters) => emitters,
        Err(e) => {
            println!("{e}");
            return Ok(1);
        }
    };
    let report = generate(&plan, &emitters);

    println!("{}", report.summary());
    for (path, reason) in &report.failed {
        println!("  failed: {} ({reason})", path.display());
    }

    Ok(if report.has_failures() { 2 } else { 0 })
}
