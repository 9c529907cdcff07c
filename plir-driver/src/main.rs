//! Print Lowering IR Driver
//!
//! Command-line entry point: loads a module from JSON, runs passes over it
//! and writes the result back as JSON.

mod config;

use clap::{Parser, Subcommand};
use config::DriverConfig;
use log::{debug, info};
use plir_common::{CompilerError, ErrorReporter};
use plir_ir::Module;
use plir_passes::lower_print::PASS_NAME;
use plir_passes::{FormatInterning, PassManager, PassRegistry};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "plir")]
#[command(about = "Lower print operations in IR modules to printf calls")]
#[command(version = "0.1.0")]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the print lowering on a module
    Lower {
        /// Input module (JSON)
        input: PathBuf,

        /// Output module (defaults to <input>.lowered.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the lowered IR to stdout
        #[arg(long)]
        print_ir: bool,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// How format strings are interned (by-content or shared-name)
        #[arg(long)]
        interning: Option<FormatInterning>,
    },

    /// Run registered passes by name
    Run {
        /// Input module (JSON)
        input: PathBuf,

        /// Comma separated pass names (defaults to the configured pipeline)
        #[arg(long, value_delimiter = ',')]
        passes: Vec<String>,

        /// Output module (defaults to <input>.out.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the resulting IR to stdout
        #[arg(long)]
        print_ir: bool,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print a module as text IR
    Print {
        /// Input module (JSON)
        input: PathBuf,
    },

    /// List the registered passes
    Passes,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Lower { input, output, print_ir, config, interning } => {
            lower_command(&input, output.as_deref(), print_ir, config.as_deref(), interning)
        }
        Commands::Run { input, passes, output, print_ir, config } => {
            run_command(&input, &passes, output.as_deref(), print_ir, config.as_deref())
        }
        Commands::Print { input } => print_command(&input),
        Commands::Passes => {
            for name in PassRegistry::default().names() {
                println!("{name}");
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_module(path: &Path) -> Result<Module, CompilerError> {
    debug!("Loading module from {}", path.display());
    let text = fs::read_to_string(path)?;
    Module::from_json(&text)
        .map_err(|e| CompilerError::invalid_ir(format!("{}: {e}", path.display())))
}

fn lower_command(
    input: &Path,
    output: Option<&Path>,
    print_ir: bool,
    config_path: Option<&Path>,
    interning: Option<FormatInterning>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = DriverConfig::load_or_default(config_path)?;
    if let Some(interning) = interning {
        config.lower_print.interning = interning;
    }

    let mut manager = config.build_pipeline(&PassRegistry::default(), &[PASS_NAME.to_string()])?;
    let output = output.map_or_else(|| default_output(input, "lowered.json"), Path::to_path_buf);
    process(input, &output, &mut manager, print_ir)
}

fn run_command(
    input: &Path,
    passes: &[String],
    output: Option<&Path>,
    print_ir: bool,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = DriverConfig::load_or_default(config_path)?;
    let names: &[String] = if passes.is_empty() { &config.pipeline } else { passes };

    let mut manager = config.build_pipeline(&PassRegistry::default(), names)?;
    let output = output.map_or_else(|| default_output(input, "out.json"), Path::to_path_buf);
    process(input, &output, &mut manager, print_ir)
}

fn print_command(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let module = load_module(input)?;
    print!("{module}");
    Ok(())
}

/// Load `input`, run `manager` over it and save the module to `output`.
/// Nothing is written when a pass fails.
fn process(
    input: &Path,
    output: &Path,
    manager: &mut PassManager,
    print_ir: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut module = load_module(input)?;
    info!("Running {} on '{}'", manager.pass_names().join(", "), module.name);

    if let Err(err) = manager.run(&mut module) {
        let mut reporter = ErrorReporter::new();
        for diagnostic in err.diagnostics() {
            reporter.report(diagnostic.clone());
        }
        reporter.print_diagnostics();
        if reporter.has_errors() {
            eprintln!("{}", reporter.summary());
        }
        return Err(CompilerError::from(err).into());
    }

    if print_ir {
        println!("=== IR Output ===");
        print!("{module}");
        println!("=== End IR ===");
    }

    fs::write(output, module.to_json()?)?;
    println!("Module written to: {}", output.display());
    Ok(())
}

/// `dir/name.json` -> `dir/name.<suffix>`
fn default_output(input: &Path, suffix: &str) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension(suffix);
    path
}
