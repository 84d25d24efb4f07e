use crate::modules::problems::extractor::{
    extract_problem_link, extract_site_name, extract_submission_date,
};
use crate::types::problem::{language_for_extension, CodeBlock, Problem};
use anyhow::Result;
use std::path::Path;

/// Description files carry this suffix; every other file is a solution
/// candidate.
const DESCRIPTION_SUFFIX: &str = ".md";

/// Groups the changed files of one commit into per-folder problem records.
///
/// A problem is named after the immediate parent directory of its description
/// file. Markdown files above the site/problem depth are repository
/// documentation and never form problems. Solutions are attached in a second
/// pass, so their position in the file list does not matter within a commit.
pub fn aggregate_problems(
    difficulty: &str,
    commit_sha: &str,
    commit_url: &str,
    files: &[(String, String)],
) -> Result<Vec<Problem>> {
    let mut problems: Vec<Problem> = Vec::new();

    for (path, content) in files {
        if !path.ends_with(DESCRIPTION_SUFFIX) {
            continue;
        }
        if path.matches('/').count() < 2 {
            tracing::debug!("{} is a repository level document, skipping", path);
            continue;
        }
        let name = match problem_name(path) {
            Some(name) => name,
            None => continue,
        };

        let problem = Problem {
            name: name.clone(),
            description: content.clone(),
            code_blocks: Vec::new(),
            difficulty: String::from(difficulty),
            site: extract_site_name(path),
            problem_url: extract_problem_link(content),
            submitted_at: extract_submission_date(content)?,
            commit_sha: String::from(commit_sha),
            commit_url: String::from(commit_url),
        };

        match problems.iter_mut().find(|existing| existing.name == name) {
            Some(existing) => *existing = problem,
            None => problems.push(problem),
        }
    }

    for (path, content) in files {
        if path.ends_with(DESCRIPTION_SUFFIX) {
            continue;
        }
        let extension = match path.rsplit_once('.') {
            Some((_, extension)) => extension,
            None => continue,
        };
        let language = match language_for_extension(extension) {
            Some(language) => language,
            None => {
                tracing::info!("{} has an unsupported extension, skipping", path);
                continue;
            }
        };
        let name = match problem_name(path) {
            Some(name) => name,
            None => continue,
        };

        match problems.iter_mut().find(|problem| problem.name == name) {
            Some(problem) => problem.code_blocks.push(CodeBlock {
                language: String::from(language),
                content: content.clone(),
            }),
            None => {
                tracing::info!(
                    "no description for solution {} in this commit, skipping",
                    path
                );
            }
        }
    }

    Ok(problems)
}

fn problem_name(path: &str) -> Option<String> {
    Path::new(path)
        .parent()
        .and_then(|parent| parent.file_name())
        .and_then(|name| name.to_str())
        .map(String::from)
}
