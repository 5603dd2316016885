mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{InitArgs, NewArgs, RewriteArgs, ServeArgs, ShowArgs, UpdateArgs};
use config::Config;
use folio_common::{ContentStore, DocumentId};
use std::sync::Arc;

/// Folio - rich-text documents with selection rewrites
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a folio.config.json
    Init(InitArgs),

    /// Serve the document API
    Serve(ServeArgs),

    /// List documents, most recently updated first
    List,

    /// Create a document
    New(NewArgs),

    /// Print one document
    Show(ShowArgs),

    /// Change a document's title or content
    Update(UpdateArgs),

    /// Delete a document
    Delete { id: DocumentId },

    /// Run a rewrite command over some text
    Rewrite(RewriteArgs),
}

fn open_store(cwd: &str) -> anyhow::Result<Arc<dyn ContentStore>> {
    commands::open_store(&Config::load(cwd)?, cwd)
}

async fn run(cli: Cli, cwd: &str) -> anyhow::Result<()> {
    match cli.command {
        Command::Init(args) => commands::init(args, cwd),
        Command::Serve(args) => commands::serve(args, &Config::load(cwd)?, cwd).await,
        Command::Rewrite(args) => commands::rewrite(args, &Config::load(cwd)?).await,
        Command::List => commands::list(open_store(cwd)?.as_ref()).await,
        Command::New(args) => commands::new(args, open_store(cwd)?.as_ref()).await,
        Command::Show(args) => commands::show(args, open_store(cwd)?.as_ref()).await,
        Command::Update(args) => commands::update(args, open_store(cwd)?.as_ref()).await,
        Command::Delete { id } => commands::delete(id, open_store(cwd)?.as_ref()).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let result = match std::env::current_dir().context("Cannot get current directory") {
        Ok(cwd) => run(cli, &cwd.display().to_string()).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
