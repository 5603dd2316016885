use anyhow::Result;
use clap::Args;
use folio_editor::{call_with_timeout, CannedRewriter, PRESET_COMMANDS};

use crate::config::Config;

#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// Instruction, e.g. one of the presets: improve grammar, summarize, make concise
    pub command: String,

    /// Text to rewrite
    pub text: String,
}

pub async fn rewrite(args: RewriteArgs, config: &Config) -> Result<()> {
    if !PRESET_COMMANDS.contains(&args.command.trim().to_lowercase().as_str()) {
        tracing::debug!("{:?} is not a preset command", args.command);
    }
    let text = call_with_timeout(
        &CannedRewriter,
        &args.text,
        &args.command,
        config.editor.rewrite_timeout(),
    )
    .await?;
    println!("{}", text);
    Ok(())
}
