//! p69 cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Resolve value maps, INPUT and --output relative to this directory
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace all tokens of a source
    ///
    /// Reads the source from stdin unless INPUT is given
    #[command(alias = "c")]
    Compile(CompileCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct CompileCommand {
    #[clap(flatten)]
    pub maps: MapArgs,

    /// Write the result to a file instead of stdout
    #[clap(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Leave unresolved tokens in place instead of failing
    #[clap(long = "lenient")]
    pub lenient: bool,

    /// Name used in diagnostics, defaults to INPUT
    #[clap(long = "reference")]
    pub reference: Option<String>,

    /// Source file
    pub input: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Load a value map (.json, .yaml, .yml or .hcl)
    ///
    /// Can be specified multiple times. Earlier maps take priority.
    #[clap(short = 'm', long = "map")]
    pub files: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// Print the tokens found in a source
    Tokens {
        #[arg(short = 'F', long = "output-format", default_value_t)]
        format: OutputFormat,

        /// Source file, stdin when absent
        input: Option<PathBuf>,
    },
    /// Print the loaded value maps
    Layers {
        #[clap(flatten)]
        maps: MapArgs,
    },
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
