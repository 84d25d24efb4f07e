pub mod model;

use crate::github::model::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::{Client, Response, Url};
use thiserror::Error;
use tokio::time::Duration;

type Result<T> = std::result::Result<T, GithubError>;

const API_BASE: &str = "https://api.github.com/";

static NEXT_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<([^>]+)>;\s*rel="next""#).unwrap());

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("failed to request to github api")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize JSON data")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid github url given")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("failed to decode base64 file content")]
    DecodeError(#[from] base64::DecodeError),
    #[error("file content is not valid UTF-8 text")]
    EncodingError(#[from] std::string::FromUtf8Error),
    #[error("{0}")]
    UnexpectedError(String),
}

/// Client for the commits and contents endpoints of one repository.
pub struct GithubClient {
    owner: String,
    repo: String,
    branch: String,
    repo_url: Url,
    client: Client,
}

impl GithubClient {
    pub fn new(token: &str, owner: &str, repo: &str, branch: &str) -> Result<Self> {
        let repo_url = Url::parse(API_BASE)?.join(&format!("repos/{}/{}/", owner, repo))?;

        let mut auth = HeaderValue::from_str(&format!("token {}", token))
            .map_err(|e| GithubError::UnexpectedError(format!("invalid token given: {}", e)))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("ps_sync"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(GithubClient {
            owner: String::from(owner),
            repo: String::from(repo),
            branch: String::from(branch),
            repo_url,
            client,
        })
    }

    /// Retrieves every commit of the repository, newest first, following the
    /// Link header page chain.
    pub async fn list_commits(&self) -> Result<Vec<CommitJson>> {
        let mut commits: Vec<CommitJson> = Vec::new();
        let mut next = Some(self.repo_url.join("commits")?);

        while let Some(url) = next {
            let res = self.client.get(url).send().await?;
            match res.error_for_status_ref() {
                Ok(_) => {
                    next = next_page_url(res.headers());
                    let mut page: Vec<CommitJson> = res.json().await?;
                    commits.append(&mut page);
                }
                Err(e) => return Err(unexpected_error(res, e).await),
            }
        }

        tracing::info!("{} commits retrieved from github.", commits.len());
        Ok(commits)
    }

    /// Lists the files changed by one commit.
    pub async fn commit_files(&self, sha: &str) -> Result<Vec<ChangedFileJson>> {
        let url = self.repo_url.join(&format!("commits/{}", sha))?;
        let res = self.client.get(url).send().await?;
        match res.error_for_status_ref() {
            Ok(_) => {
                let detail: CommitDetailJson = res.json().await?;
                Ok(detail.files.unwrap_or_default())
            }
            Err(e) => Err(unexpected_error(res, e).await),
        }
    }

    /// Fetches the raw content of a file on the configured branch.
    ///
    /// The contents endpoint delivers the body base64 encoded with embedded
    /// line breaks.
    pub async fn file_content(&self, path: &str) -> Result<String> {
        let url = self.repo_url.join(&format!("contents/{}", path))?;
        let res = self
            .client
            .get(url)
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;
        match res.error_for_status_ref() {
            Ok(_) => {
                let body: ContentJson = res.json().await?;
                decode_content(&body.content)
            }
            Err(e) => Err(unexpected_error(res, e).await),
        }
    }

    pub fn commit_url(&self, sha: &str) -> String {
        format!("https://github.com/{}/{}/commit/{}", self.owner, self.repo, sha)
    }
}

fn next_page_url(headers: &HeaderMap) -> Option<Url> {
    let link = headers.get(LINK)?.to_str().ok()?;
    let captures = NEXT_LINK.captures(link)?;
    Url::parse(&captures[1]).ok()
}

fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}

async fn unexpected_error(res: Response, e: reqwest::Error) -> GithubError {
    let msg = res
        .json::<ErrorJson>()
        .await
        .map(|body| body.message)
        .unwrap_or_default();
    GithubError::UnexpectedError(format!(
        "unexpected error [{}] cause [{}]",
        e.to_string(),
        msg
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn create_new_client() {
        let client = GithubClient::new("token", "octocat", "hello-world", "main").unwrap();

        assert_eq!(
            client.repo_url,
            Url::parse("https://api.github.com/repos/octocat/hello-world/").unwrap()
        );
        assert_eq!(
            client.commit_url("abc123"),
            "https://github.com/octocat/hello-world/commit/abc123"
        );
    }

    #[test]
    fn parse_next_page_link() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/repositories/1/commits?page=2>; rel="next", <https://api.github.com/repositories/1/commits?page=5>; rel="last""#,
            ),
        );

        let next = next_page_url(&headers).unwrap();
        assert_eq!(
            next,
            Url::parse("https://api.github.com/repositories/1/commits?page=2").unwrap()
        );
    }

    #[test]
    fn no_next_page_on_last_page() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/repositories/1/commits?page=4>; rel="prev""#,
            ),
        );

        assert!(next_page_url(&headers).is_none());
        assert!(next_page_url(&HeaderMap::new()).is_none());
    }

    #[test]
    fn decode_wrapped_base64_content() {
        // The contents endpoint wraps the encoded body in 60 column lines.
        let encoded = "7JWI64WV\n7ZWY7IS47JqU\n";

        assert_eq!(decode_content(encoded).unwrap(), "안녕하세요");
        assert_eq!(decode_content("").unwrap(), "");
    }
}
