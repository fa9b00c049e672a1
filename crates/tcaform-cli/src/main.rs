//! tcaform CLI
//!
//! Command-line interface for the tcaform TCA layout compiler

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tcaform_core::{Result, TcaError, init_tracing};
use tracing::error;

#[derive(Parser)]
#[command(name = "tcaform")]
#[command(about = "tcaform: form-tree builder and show-item compiler for TCA tables")]
#[command(version = tcaform_core::VERSION)]
#[command(
    long_about = "tcaform turns TCA table configuration into editable form trees and back.\n\
Derived types are reduced to minimal columnsOverrides and shared palettes.\n\
\n\
Examples:\n  \
tcaform compile Configuration/TCA/        # Compile every table in a directory\n  \
tcaform compile tt_content.json -o out.json\n  \
tcaform parse '--div--;General,title'     # Show the parsed show-item entries\n  \
tcaform diff base.json type.json          # Print column overrides\n  \
tcaform config init                       # Initialize configuration file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (tcaform.yaml/.tcaformrc.json/.tcaformrc.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel compilation
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile TCA table documents into minimal override form
    #[command(alias = "build")]
    Compile {
        /// JSON/YAML file or directory of files mapping table names to TCA
        #[arg(help = "Input file or directory")]
        input: PathBuf,

        #[arg(short, long, help = "Write the compiled document to a file (default: stdout)")]
        output: Option<PathBuf>,

        #[arg(short, long, help = "Output format (default: from configuration, else json)")]
        format: Option<DocumentFormat>,

        #[arg(
            short,
            long,
            help = "Only compile the named table (can be used multiple times)"
        )]
        table: Vec<String>,

        #[arg(long, help = "Emit compact JSON regardless of configuration")]
        compact: bool,

        #[arg(long, help = "Skip tables that fail to compile instead of aborting")]
        keep_going: bool,
    },

    /// Parse a show-item string and print its entries as JSON
    Parse {
        #[arg(help = "Show-item string, e.g. '--div--;General,title;Title'", allow_hyphen_values = true)]
        showitem: String,
    },

    /// Print the column overrides a derived type needs over a base
    Diff {
        #[arg(help = "JSON/YAML file with the base columns")]
        base: PathBuf,

        #[arg(help = "JSON/YAML file with the derived type's columns")]
        derived: PathBuf,

        #[arg(
            long,
            help = "Treat the field as a real column even if the base lacks it (can be used multiple times)"
        )]
        real: Vec<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Create a new configuration file in the current directory
    Init {
        #[arg(long, default_value = "yaml", help = "Configuration file format")]
        format: ConfigFormat,

        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Display the configuration in effect
    Show {
        #[arg(long, help = "Show the resolved compiler options instead of the file contents")]
        resolved: bool,
    },

    /// Print the JSON schema of the configuration file
    Schema {
        #[arg(short, long, help = "Write the schema to a file (default: stdout)")]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DocumentFormat {
    Json,
    Yaml,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return Ok(());
    }

    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "tcaform=error",
        1 => "tcaform=warn",
        2 => "tcaform=info",
        3 => "tcaform=debug",
        _ => "tcaform=trace",
    };
    // SAFETY: set before any other thread is spawned
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        std::process::exit(1);
    }

    match run_command(cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("tcaform failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Compile {
            input,
            output,
            format,
            table,
            compact,
            keep_going,
        }) => commands::compile::compile_command(
            input,
            output,
            format.map(Into::into),
            table,
            compact,
            keep_going,
            cli.config,
        ),

        Some(Commands::Parse { showitem }) => commands::parse::parse_command(&showitem),

        Some(Commands::Diff {
            base,
            derived,
            real,
        }) => commands::diff::diff_command(&base, &derived, &real),

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => {
                commands::config::config_init_command(format, force)
            }
            ConfigAction::Show { resolved } => {
                commands::config::config_show_command(resolved, cli.config)
            }
            ConfigAction::Schema { output } => commands::config::config_schema_command(output),
        },

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()
                .map_err(|e| TcaError::io_error("<stdout>", e))?;
            Ok(())
        }
    }
}

impl From<DocumentFormat> for tcaform_core::OutputFormat {
    fn from(format: DocumentFormat) -> Self {
        match format {
            DocumentFormat::Json => tcaform_core::OutputFormat::Json,
            DocumentFormat::Yaml => tcaform_core::OutputFormat::Yaml,
        }
    }
}
