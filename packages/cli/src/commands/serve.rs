use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::CannedRewriter;
use folio_server::AppState;

use super::open_store;
use crate::config::Config;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config and SERVER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,
}

pub async fn serve(args: ServeArgs, config: &Config, cwd: &str) -> Result<()> {
    let host = args.host.unwrap_or_else(|| config.host.clone());
    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let store = open_store(config, cwd)?;
    let state = AppState::new(store, Arc::new(CannedRewriter))
        .with_rewrite_timeout(config.editor.rewrite_timeout());

    println!("{}", "🚀 Starting Folio server...".bright_blue().bold());
    println!("   Database: {}", config.database_path(cwd).display());
    println!("   Listening on http://{}", addr.to_string().cyan());

    folio_server::serve(addr, state).await?;
    Ok(())
}
