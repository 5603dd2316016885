use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_common::{ContentStore, Document, DocumentId, DocumentPatch, NewDocument};
use folio_markup::{check_well_formed, text_content};

#[derive(Debug, Args)]
pub struct NewArgs {
    pub title: String,

    /// Initial markup content
    #[arg(short, long, default_value = "")]
    pub content: String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: DocumentId,

    /// Print visible text instead of markup
    #[arg(long)]
    pub plain: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: DocumentId,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub content: Option<String>,
}

fn summary(document: &Document) -> String {
    format!(
        "{:>4}  {}  {}",
        document.id.to_string().cyan(),
        document.updated_at.format("%Y-%m-%d %H:%M"),
        document.title.bright_white()
    )
}

/// Markup handed in on the command line must parse like canvas content
fn check_content(content: &str) -> Result<()> {
    check_well_formed(content).map_err(|err| anyhow!("Content is not well-formed: {}", err))
}

pub async fn list(store: &dyn ContentStore) -> Result<()> {
    let documents = store.list().await?;
    if documents.is_empty() {
        println!("No documents yet. Create one with: folio new <title>");
        return Ok(());
    }
    for document in &documents {
        println!("{}", summary(document));
    }
    Ok(())
}

pub async fn new(args: NewArgs, store: &dyn ContentStore) -> Result<()> {
    check_content(&args.content)?;
    let document = store
        .create(NewDocument::new(args.title.trim(), args.content))
        .await?;
    println!("  {} Created document {}", "✓".green(), document.id);
    Ok(())
}

pub async fn show(args: ShowArgs, store: &dyn ContentStore) -> Result<()> {
    let document = store
        .get(args.id)
        .await?
        .ok_or_else(|| anyhow!("Document {} not found", args.id))?;

    println!("{}", summary(&document));
    println!();
    if args.plain {
        println!("{}", text_content(&document.content));
    } else {
        println!("{}", document.content);
    }
    Ok(())
}

pub async fn update(args: UpdateArgs, store: &dyn ContentStore) -> Result<()> {
    if let Some(content) = &args.content {
        check_content(content)?;
    }
    let patch = DocumentPatch {
        title: args.title,
        content: args.content,
    };
    if patch.is_empty() {
        return Err(anyhow!("Nothing to update; pass --title or --content"));
    }

    let document = store
        .update(args.id, patch)
        .await?
        .ok_or_else(|| anyhow!("Document {} not found", args.id))?;
    println!("  {} Updated {}", "✓".green(), summary(&document));
    Ok(())
}

pub async fn delete(id: DocumentId, store: &dyn ContentStore) -> Result<()> {
    if store.delete(id).await? {
        println!("  {} Deleted document {}", "✓".green(), id);
        Ok(())
    } else {
        Err(anyhow!("Document {} not found", id))
    }
}
