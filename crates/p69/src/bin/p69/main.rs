mod cli;

use p69::engine::{substitute, Config};
use p69::layers::Layers;
use p69::scanner::{scan_all, Token};
use std::path::Path;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("P69_LOG"))
        .with_writer(std::io::stderr)
        .init();

    if let Some(directory) = &cli.directory {
        if let Err(err) = std::env::set_current_dir(directory) {
            eprintln!("Failed to change directory to {}\n{}", directory.display(), err);
            std::process::exit(1);
        }
        tracing::info!(directory=%directory.display(), "Changed working directory");
    }

    let command_result = match cli.command {
        cli::Command::Compile(compile_cli) => compile(compile_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn compile(cli: cli::CompileCommand) -> anyhow::Result<()> {
    let layers = load(&cli.maps)?;
    let source = read_source(cli.input.as_deref())?;

    let reference = cli
        .reference
        .or_else(|| cli.input.as_ref().map(|path| path.display().to_string()))
        .unwrap_or_else(|| "<stdin>".to_string());
    let config = Config::default()
        .with_throw_if_missing(!cli.lenient)
        .with_reference(reference);

    let substitution = substitute(layers.as_slice(), &source, &config)?;
    if !substitution.failures.is_empty() {
        tracing::warn!(
            count = substitution.failures.len(),
            "tokens left unreplaced"
        );
    }

    let css = format!("{}\n", substitution.text.trim());
    match &cli.output {
        Some(path) => std::fs::write(path, css)?,
        None => print!("{css}"),
    }

    Ok(())
}

fn load(maps: &cli::MapArgs) -> anyhow::Result<Layers> {
    let mut layers = Layers::default();

    for file_path in &maps.files {
        layers.load_file(file_path)?;
    }

    if layers.is_empty() {
        tracing::warn!("no value maps loaded, every token will be missing");
    }

    Ok(layers)
}

fn read_source(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}

fn output(format: &cli::OutputFormat, tokens: &[Token]) -> anyhow::Result<()> {
    match format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), tokens)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), tokens)?,
    };

    Ok(())
}

/// (p69-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    match cli.command {
        cli::DevSubCommand::Tokens { format, input } => {
            let source = read_source(input.as_deref())?;

            let mut tokens = vec![];
            for scanned in scan_all(&source) {
                match scanned {
                    Ok(token) => tokens.push(token),
                    Err(failure) => eprintln!("{}: {}", failure.token.raw, failure.error),
                }
            }

            output(&format, &tokens)?;
        }
        cli::DevSubCommand::Layers { maps } => {
            let layers = load(&maps)?;
            for (source, layer) in layers.iter() {
                match source {
                    Some(path) => println!("# {}", path.display()),
                    None => println!("# <inline>"),
                }
                println!("{layer:#?}");
            }
        }
    }

    Ok(())
}
