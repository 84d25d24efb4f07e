pub mod block;
pub mod model;

use crate::notion::model::*;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, Url};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::time::Duration;

type Result<T> = std::result::Result<T, NotionError>;

const API_BASE: &str = "https://api.notion.com/v1/";
const NOTION_VERSION: &str = "2022-06-28";

/// Query pagination page size, the maximum the API accepts.
pub const QUERY_PAGE_SIZE: usize = 100;
/// The append endpoint rejects calls carrying more blocks than this.
pub const APPEND_BATCH_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum NotionError {
    #[error("failed to request to notion api")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize JSON data")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid notion url given")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("{0}")]
    UnexpectedError(String),
}

#[async_trait]
pub trait NotionDatabase {
    async fn query_pages(&self) -> Result<Vec<PageJson>>;
    async fn select_options(&self, property: &str) -> Result<Vec<String>>;
    async fn create_page(&self, properties: &PageProperties) -> Result<String>;
    async fn append_blocks(&self, page_id: &str, blocks: &[Value]) -> Result<()>;
}

pub struct HttpNotionDatabase {
    database_id: String,
    base_url: Url,
    query_url: Url,
    database_url: Url,
    pages_url: Url,
    client: Client,
}

impl HttpNotionDatabase {
    pub fn new(api_key: &str, database_id: &str) -> Result<Self> {
        let base_url = Url::parse(API_BASE)?;
        let query_url = base_url.join(&format!("databases/{}/query", database_id))?;
        let database_url = base_url.join(&format!("databases/{}", database_id))?;
        let pages_url = base_url.join("pages")?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| NotionError::UnexpectedError(format!("invalid api key given: {}", e)))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(HttpNotionDatabase {
            database_id: String::from(database_id),
            base_url,
            query_url,
            database_url,
            pages_url,
            client,
        })
    }
}

#[async_trait]
impl NotionDatabase for HttpNotionDatabase {
    /// Retrieves every page of the database, following the query cursor.
    async fn query_pages(&self) -> Result<Vec<PageJson>> {
        let mut pages: Vec<PageJson> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut payload = json!({ "page_size": QUERY_PAGE_SIZE });
            if let Some(cursor) = &cursor {
                payload["start_cursor"] = json!(cursor);
            }

            let res = self
                .client
                .post(self.query_url.clone())
                .json(&payload)
                .send()
                .await?;
            let body: QueryResponseJson = match res.error_for_status_ref() {
                Ok(_) => res.json().await?,
                Err(e) => return Err(unexpected_error(res, e).await),
            };

            pages.extend(body.results);
            if !body.has_more {
                break;
            }
            cursor = body.next_cursor;
            if cursor.is_none() {
                break;
            }
        }

        Ok(pages)
    }

    /// Returns the allowed values of a select property, in schema order.
    async fn select_options(&self, property: &str) -> Result<Vec<String>> {
        let res = self.client.get(self.database_url.clone()).send().await?;
        match res.error_for_status_ref() {
            Ok(_) => {
                let body: DatabaseJson = res.json().await?;
                Ok(body.select_options(property))
            }
            Err(e) => Err(unexpected_error(res, e).await),
        }
    }

    async fn create_page(&self, properties: &PageProperties) -> Result<String> {
        let payload = properties.to_create_request(&self.database_id);
        let res = self
            .client
            .post(self.pages_url.clone())
            .json(&payload)
            .send()
            .await?;
        match res.error_for_status_ref() {
            Ok(_) => {
                let body: CreatedPageJson = res.json().await?;
                Ok(body.id)
            }
            Err(e) => Err(unexpected_error(res, e).await),
        }
    }

    /// Appends body blocks to a page, split into batches the endpoint accepts.
    async fn append_blocks(&self, page_id: &str, blocks: &[Value]) -> Result<()> {
        let url = self.base_url.join(&format!("blocks/{}/children", page_id))?;

        for batch in blocks.chunks(APPEND_BATCH_LIMIT) {
            let payload = json!({ "children": batch });
            let res = self
                .client
                .patch(url.clone())
                .json(&payload)
                .send()
                .await?;
            if let Err(e) = res.error_for_status_ref() {
                return Err(unexpected_error(res, e).await);
            }
        }

        Ok(())
    }
}

async fn unexpected_error(res: Response, e: reqwest::Error) -> NotionError {
    let msg = res
        .json::<ErrorJson>()
        .await
        .map(|body| body.message)
        .unwrap_or_default();
    NotionError::UnexpectedError(format!(
        "unexpected error [{}] cause [{}]",
        e.to_string(),
        msg
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::env;

    #[test]
    fn create_new_database_client() {
        let database = HttpNotionDatabase::new("secret", "abc123").unwrap();

        assert_eq!(
            database.query_url,
            Url::parse("https://api.notion.com/v1/databases/abc123/query").unwrap()
        );
        assert_eq!(
            database.database_url,
            Url::parse("https://api.notion.com/v1/databases/abc123").unwrap()
        );
        assert_eq!(
            database.pages_url,
            Url::parse("https://api.notion.com/v1/pages").unwrap()
        );
    }

    /// Normal system test of the query api.
    ///
    /// Run this test with NOTION_API_KEY and NOTION_DATABASE_ID pointing at a
    /// database the integration token is allowed to read.
    #[tokio::test]
    #[ignore]
    async fn test_query_pages() {
        let api_key = env::var("NOTION_API_KEY").unwrap();
        let database_id = env::var("NOTION_DATABASE_ID").unwrap();
        let database = HttpNotionDatabase::new(&api_key, &database_id).unwrap();

        let pages = database.query_pages().await.unwrap();
        for page in &pages {
            assert!(!page.id.is_empty());
        }
    }
}
