use anyhow::{Context, Result};
use std::env;

/// Connection coordinates for both remote APIs, read once at startup and
/// passed by reference to every collaborator that needs them.
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub github_owner: String,
    pub github_repo: String,
    pub github_branch: String,
    pub notion_api_key: String,
    pub notion_database_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            github_token: require("GITHUB_TOKEN")?,
            github_owner: require("GITHUB_OWNER")?,
            github_repo: require("GITHUB_REPO")?,
            github_branch: env::var("GITHUB_BRANCH").unwrap_or(String::from("main")),
            notion_api_key: require("NOTION_API_KEY")?,
            notion_database_id: require("NOTION_DATABASE_ID")?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name).with_context(|| {
        let message = format!("{} must be configured.", name);
        tracing::error!(message);
        message
    })
}
