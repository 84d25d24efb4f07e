use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CommitJson {
    pub sha: String,
    pub commit: CommitBodyJson,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommitBodyJson {
    pub message: String,
    pub author: Option<CommitAuthorJson>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommitAuthorJson {
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetailJson {
    pub sha: String,
    pub files: Option<Vec<ChangedFileJson>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChangedFileJson {
    pub filename: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentJson {
    pub content: String,
    pub encoding: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorJson {
    #[serde(default)]
    pub message: String,
}
