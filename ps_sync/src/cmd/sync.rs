use crate::config::Config;
use crate::modules::problems::aggregator::aggregate_problems;
use crate::modules::problems::extractor::extract_difficulty;
use crate::modules::reconciler::Reconciler;
use crate::modules::uploader::ProblemUploader;
use anyhow::{Context, Result};
use clap::Args;
use ps_sync_libs::github::GithubClient;
use ps_sync_libs::notion::model::{DIFFICULTY_PROPERTY, TITLE_PROPERTY};
use ps_sync_libs::notion::{HttpNotionDatabase, NotionDatabase};
use std::collections::HashSet;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Process only the most recent N commits.
    #[arg(long)]
    limit: Option<usize>,
}

pub async fn run(args: SyncArgs) -> Result<()> {
    let config = Config::from_env()?;

    let notion = HttpNotionDatabase::new(&config.notion_api_key, &config.notion_database_id)
        .with_context(|| {
            let message = "failed to create the notion database client";
            tracing::error!(message);
            message
        })?;

    // The existing title set guards against duplicate creation; without it
    // the whole run is pointless, so a failure here is fatal.
    let existing_pages = notion.query_pages().await.with_context(|| {
        let message = "failed to query the existing pages of the notion database";
        tracing::error!(message);
        message
    })?;
    let existing_titles: HashSet<String> = existing_pages
        .iter()
        .filter_map(|page| page.title(TITLE_PROPERTY))
        .collect();
    tracing::info!(
        "{} problems are already present in the database.",
        existing_titles.len()
    );

    let difficulty_options = match notion.select_options(DIFFICULTY_PROPERTY).await {
        Ok(options) => options,
        Err(e) => {
            tracing::warn!(
                "failed to fetch the difficulty options, every difficulty will fall back to Unknown: {}",
                e
            );
            Vec::new()
        }
    };

    let github = GithubClient::new(
        &config.github_token,
        &config.github_owner,
        &config.github_repo,
        &config.github_branch,
    )
    .with_context(|| {
        let message = "failed to create the github client";
        tracing::error!(message);
        message
    })?;

    let commits = match github.list_commits().await {
        Ok(commits) => commits,
        Err(e) => {
            tracing::error!("failed to list commits from github: {}", e);
            return Ok(());
        }
    };
    if commits.is_empty() {
        tracing::info!("no commits to synchronize.");
        return Ok(());
    }

    let window = args.limit.unwrap_or(commits.len()).min(commits.len());
    tracing::info!("{} commits retrieved, {} will be processed.", commits.len(), window);

    let mut reconciler = Reconciler::new();
    for commit in &commits[..window] {
        let subject = commit.commit.message.lines().next().unwrap_or("");
        tracing::info!("processing commit {}: {}", commit.sha, subject);

        let files = match github.commit_files(&commit.sha).await {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("failed to list the changed files of {}: {}", commit.sha, e);
                continue;
            }
        };
        if files.is_empty() {
            tracing::info!("commit {} has no changed files.", commit.sha);
            continue;
        }

        let mut contents: Vec<(String, String)> = Vec::with_capacity(files.len());
        for file in &files {
            tracing::debug!("{} ({})", file.filename, file.status);
            match github.file_content(&file.filename).await {
                Ok(content) => contents.push((file.filename.clone(), content)),
                Err(e) => {
                    tracing::error!("failed to fetch the content of {}: {}", file.filename, e);
                }
            }
        }

        let difficulty = extract_difficulty(&commit.commit.message);
        let problems = aggregate_problems(
            &difficulty,
            &commit.sha,
            &github.commit_url(&commit.sha),
            &contents,
        )?;
        for problem in problems {
            reconciler.observe(problem);
        }
    }

    let uploader = ProblemUploader::new(&notion);
    for mut problem in reconciler.into_problems() {
        if existing_titles.contains(&problem.name) {
            tracing::info!("{} already exists in the database, skipping.", problem.name);
            continue;
        }
        if !difficulty_options.contains(&problem.difficulty) {
            tracing::info!(
                "difficulty {} of {} is not an option of the database schema, falling back to Unknown.",
                problem.difficulty,
                problem.name
            );
            problem.difficulty = String::from("Unknown");
        }

        if let Err(e) = uploader.upload(&problem).await {
            tracing::error!("failed to upload {}: {:?}", problem.name, e);
        }
    }

    Ok(())
}
