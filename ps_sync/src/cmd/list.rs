use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use ps_sync_libs::notion::model::TITLE_PROPERTY;
use ps_sync_libs::notion::{HttpNotionDatabase, NotionDatabase};

#[derive(Debug, Args)]
pub struct ListArgs {}

/// Prints every page currently present in the destination database.
pub async fn run(_args: ListArgs) -> Result<()> {
    let config = Config::from_env()?;

    let notion = HttpNotionDatabase::new(&config.notion_api_key, &config.notion_database_id)
        .with_context(|| {
            let message = "failed to create the notion database client";
            tracing::error!(message);
            message
        })?;

    let pages = notion.query_pages().await.with_context(|| {
        let message = "failed to query the notion database";
        tracing::error!(message);
        message
    })?;

    if pages.is_empty() {
        println!("the notion database has no pages yet.");
        return Ok(());
    }

    println!("{} pages in the notion database:", pages.len());
    for page in &pages {
        let title = page
            .title(TITLE_PROPERTY)
            .unwrap_or(String::from("(untitled)"));
        let created = page.created_time.as_deref().unwrap_or("unknown");
        println!("{} | created at {}", title, created);
    }

    Ok(())
}
