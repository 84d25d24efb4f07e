use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

pub const TITLE_PROPERTY: &str = "문제 제목";
pub const LINK_PROPERTY: &str = "문제 링크";
pub const COMMIT_PROPERTY: &str = "GitHub 링크";
pub const DIFFICULTY_PROPERTY: &str = "난이도";
pub const SITE_PROPERTY: &str = "사이트";
pub const DATE_PROPERTY: &str = "제출 일자";

#[derive(Debug, Deserialize)]
pub struct QueryResponseJson {
    pub results: Vec<PageJson>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PageJson {
    pub id: String,
    pub created_time: Option<String>,
    pub properties: Value,
}

impl PageJson {
    /// Extracts the plain text of a title property, if the page carries one.
    pub fn title(&self, property: &str) -> Option<String> {
        self.properties
            .get(property)?
            .get("title")?
            .get(0)?
            .get("text")?
            .get("content")?
            .as_str()
            .map(String::from)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseJson {
    pub properties: Value,
}

impl DatabaseJson {
    pub fn select_options(&self, property: &str) -> Vec<String> {
        self.properties
            .get(property)
            .and_then(|prop| prop.get("select"))
            .and_then(|select| select.get("options"))
            .and_then(|options| options.as_array())
            .map(|options| {
                options
                    .iter()
                    .filter_map(|option| option.get("name"))
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatedPageJson {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorJson {
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// The fixed property set of one problem page.
#[derive(Debug, Clone)]
pub struct PageProperties {
    pub title: String,
    pub problem_url: Option<String>,
    pub commit_url: String,
    pub difficulty: String,
    pub site: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl PageProperties {
    pub fn to_create_request(&self, database_id: &str) -> Value {
        let mut properties = Map::new();
        properties.insert(
            String::from(TITLE_PROPERTY),
            json!({ "title": [{ "text": { "content": self.title } }] }),
        );
        properties.insert(
            String::from(COMMIT_PROPERTY),
            json!({ "url": self.commit_url }),
        );
        properties.insert(
            String::from(DIFFICULTY_PROPERTY),
            json!({ "select": { "name": self.difficulty } }),
        );
        properties.insert(
            String::from(SITE_PROPERTY),
            json!({ "select": { "name": self.site } }),
        );
        if let Some(url) = &self.problem_url {
            properties.insert(String::from(LINK_PROPERTY), json!({ "url": url }));
        }
        if let Some(submitted_at) = &self.submitted_at {
            properties.insert(
                String::from(DATE_PROPERTY),
                json!({ "date": { "start": submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true) } }),
            );
        }

        json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        })
    }
}
