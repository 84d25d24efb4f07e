use crate::modules::problems::converter::BlockConverter;
use crate::modules::utils::{chunk_text, MAX_TEXT_LENGTH};
use crate::types::problem::Problem;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use ps_sync_libs::notion::block::ContentBlock;
use ps_sync_libs::notion::model::PageProperties;
use ps_sync_libs::notion::NotionDatabase;
use serde_json::Value;

static CONVERTER: Lazy<BlockConverter> = Lazy::new(BlockConverter::new);

const DESCRIPTION_HEADING: &str = "문제 설명";
const CODE_HEADING: &str = "소스 코드";

pub struct ProblemUploader<'a, D> {
    database: &'a D,
}

impl<'a, D: NotionDatabase + Sync> ProblemUploader<'a, D> {
    pub fn new(database: &'a D) -> Self {
        Self { database }
    }

    /// Creates the page for one problem and appends its body.
    ///
    /// Creation and append are separate calls. A page whose append fails
    /// stays behind without a body; this is reported in the log and not
    /// compensated.
    pub async fn upload(&self, problem: &Problem) -> Result<()> {
        let properties = PageProperties {
            title: problem.name.clone(),
            problem_url: problem.problem_url.clone(),
            commit_url: problem.commit_url.clone(),
            difficulty: problem.difficulty.clone(),
            site: problem.site.clone(),
            submitted_at: problem.submitted_at,
        };

        let page_id = self
            .database
            .create_page(&properties)
            .await
            .with_context(|| {
                let message = format!("failed to create a page for {}", problem.name);
                tracing::error!(message);
                message
            })?;

        let blocks = body_blocks(problem);
        self.database
            .append_blocks(&page_id, &blocks)
            .await
            .with_context(|| {
                let message = format!(
                    "failed to append the body of {} to page {}, the page is left without content",
                    problem.name, page_id
                );
                tracing::error!(message);
                message
            })?;

        tracing::info!("problem {} was uploaded.", problem.name);
        Ok(())
    }
}

/// Assembles the full page body: the converted description, then every
/// solution with long code split into consecutive blocks under the size
/// ceiling.
pub fn body_blocks(problem: &Problem) -> Vec<Value> {
    let mut blocks: Vec<ContentBlock> = Vec::new();

    blocks.push(ContentBlock::Heading {
        level: 2,
        text: String::from(DESCRIPTION_HEADING),
    });
    blocks.extend(CONVERTER.convert(&problem.description));

    blocks.push(ContentBlock::Heading {
        level: 2,
        text: String::from(CODE_HEADING),
    });
    for code in &problem.code_blocks {
        for chunk in chunk_text(&code.content, MAX_TEXT_LENGTH) {
            blocks.push(ContentBlock::Code {
                language: code.language.clone(),
                text: chunk,
            });
        }
    }

    blocks.iter().map(ContentBlock::to_json).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::problem::CodeBlock;

    fn problem() -> Problem {
        Problem {
            name: String::from("two-sum"),
            description: String::from("# two-sum\n\nfind the pair\n"),
            code_blocks: vec![CodeBlock {
                language: String::from("java"),
                content: String::from("class Solution {}"),
            }],
            difficulty: String::from("Easy"),
            site: String::from("siteA"),
            problem_url: None,
            submitted_at: None,
            commit_sha: String::from("abc123"),
            commit_url: String::from("https://github.com/o/r/commit/abc123"),
        }
    }

    #[test]
    fn body_carries_description_and_code_under_their_headings() {
        let blocks = body_blocks(&problem());

        assert_eq!(blocks[0]["type"], "heading_2");
        assert_eq!(
            blocks[0]["heading_2"]["rich_text"][0]["text"]["content"],
            DESCRIPTION_HEADING
        );
        assert_eq!(blocks[1]["type"], "heading_1");
        assert_eq!(blocks[2]["type"], "paragraph");
        assert_eq!(
            blocks[3]["heading_2"]["rich_text"][0]["text"]["content"],
            CODE_HEADING
        );
        assert_eq!(blocks[4]["type"], "code");
        assert_eq!(blocks[4]["code"]["language"], "java");
        assert_eq!(blocks.len(), 5);
    }

    #[test]
    fn long_code_is_split_into_consecutive_blocks() {
        let mut problem = problem();
        problem.code_blocks = vec![CodeBlock {
            language: String::from("python"),
            content: "x".repeat(MAX_TEXT_LENGTH * 2 + 1),
        }];

        let blocks = body_blocks(&problem);
        let code_blocks: Vec<&Value> = blocks
            .iter()
            .filter(|block| block["type"] == "code")
            .collect();
        assert_eq!(code_blocks.len(), 3);
        for block in &code_blocks {
            assert_eq!(block["code"]["language"], "python");
        }
    }
}
