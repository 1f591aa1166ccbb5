mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{init, replay, tree, validate, InitArgs, ReplayArgs, TreeArgs, ValidateArgs};
use config::Config;

/// formsync CLI - drive the form editing mediator from the terminal
#[derive(Parser, Debug)]
#[command(name = "formsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a formsync.config.json and an example document
    Init(InitArgs),

    /// Run a message script through a session and print every response
    Replay(ReplayArgs),

    /// Print the navigation tree derived from a document
    Tree(TreeArgs),

    /// Check a document against its schemas and link invariants
    Validate(ValidateArgs),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();
    let config = Config::load(&cwd)?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Replay(args) => replay(args, &config),
        Command::Tree(args) => tree(args, &config),
        Command::Validate(args) => validate(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
