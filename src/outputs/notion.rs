//! Notion database store.
//!
//! Creates one page per record via `POST /v1/pages`. The database schema is
//! owned by whoever created the database, so property names are
//! configurable; the defaults match a Korean-labelled digest database:
//!
//! | Record field | Property | Notion type |
//! |--------------|----------|-------------|
//! | `date` | `날짜` | date |
//! | `title` | `제목` | title |
//! | `summary` | `요약` | rich_text |
//! | `link` | `URL` | url |

use reqwest::Client;
use serde_json::{Value, json};
use tracing::{error, info, instrument, warn};

use crate::error::StoreError;
use crate::models::ArticleRecord;
use crate::outputs::RecordStore;

pub const NOTION_API_BASE: &str = "https://api.notion.com";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion caps a single text object's content at 2000 characters.
const MAX_TEXT_CHARS: usize = 2000;

/// Notion caps a rich text array at 100 elements.
const MAX_TEXT_FRAGMENTS: usize = 100;

/// Property names in the target database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionSchema {
    pub date: String,
    pub title: String,
    pub summary: String,
    pub url: String,
}

impl Default for NotionSchema {
    fn default() -> Self {
        Self {
            date: "날짜".to_string(),
            title: "제목".to_string(),
            summary: "요약".to_string(),
            url: "URL".to_string(),
        }
    }
}

pub struct NotionStore {
    client: Client,
    api_base: String,
    token: String,
    database_id: String,
    schema: NotionSchema,
}

impl std::fmt::Debug for NotionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionStore")
            .field("api_base", &self.api_base)
            .field("database_id", &self.database_id)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl NotionStore {
    pub fn new(client: Client, token: String, database_id: String) -> Self {
        Self {
            client,
            api_base: NOTION_API_BASE.to_string(),
            token,
            database_id,
            schema: NotionSchema::default(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_schema(mut self, schema: NotionSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Request body for `POST /v1/pages`.
    pub fn page_body(&self, record: &ArticleRecord) -> Value {
        let mut properties = serde_json::Map::new();
        properties.insert(self.schema.date.clone(), json!({ "date": { "start": record.date } }));
        properties.insert(self.schema.title.clone(), json!({ "title": text_fragments(&record.title) }));
        properties.insert(
            self.schema.summary.clone(),
            json!({ "rich_text": text_fragments(&record.summary) }),
        );
        properties.insert(self.schema.url.clone(), json!({ "url": record.link }));

        json!({
            "parent": { "database_id": self.database_id },
            "properties": properties,
        })
    }
}

impl RecordStore for NotionStore {
    #[instrument(level = "info", skip_all, fields(database_id = %self.database_id, link = %record.link))]
    async fn save(&self, record: &ArticleRecord) -> Result<(), StoreError> {
        let url = format!("{}/v1/pages", self.api_base.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&self.page_body(record))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "Notion rejected page");
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Created Notion page");
        Ok(())
    }
}

/// Split `text` into Notion text objects of at most [`MAX_TEXT_CHARS`]
/// characters. Text beyond [`MAX_TEXT_FRAGMENTS`] objects is dropped.
fn text_fragments(text: &str) -> Vec<Value> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![json!({ "text": { "content": "" } })];
    }
    let chunks = chars.chunks(MAX_TEXT_CHARS);
    if chunks.len() > MAX_TEXT_FRAGMENTS {
        warn!(
            chars = chars.len(),
            kept_chars = MAX_TEXT_CHARS * MAX_TEXT_FRAGMENTS,
            "Text exceeds Notion's rich text limit; truncating"
        );
    }
    chunks
        .take(MAX_TEXT_FRAGMENTS)
        .map(|chunk| json!({ "text": { "content": chunk.iter().collect::<String>() } }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record() -> ArticleRecord {
        ArticleRecord {
            title: "Title A".to_string(),
            summary: "짧은 요약".to_string(),
            link: "https://www.fashionbiz.co.kr/news/articleView.html?idxno=1".to_string(),
            date: "2025-05-06".to_string(),
        }
    }

    fn store(api_base: &str) -> NotionStore {
        NotionStore::new(Client::new(), "secret-token".to_string(), "db-123".to_string())
            .with_api_base(api_base)
    }

    #[test]
    fn test_page_body_uses_schema_names() {
        let body = store(NOTION_API_BASE).page_body(&record());
        assert_eq!(body["parent"]["database_id"], "db-123");
        assert_eq!(body["properties"]["날짜"]["date"]["start"], "2025-05-06");
        assert_eq!(body["properties"]["제목"]["title"][0]["text"]["content"], "Title A");
        assert_eq!(body["properties"]["요약"]["rich_text"][0]["text"]["content"], "짧은 요약");
        assert_eq!(
            body["properties"]["URL"]["url"],
            "https://www.fashionbiz.co.kr/news/articleView.html?idxno=1"
        );
    }

    #[test]
    fn test_custom_schema() {
        let schema = NotionSchema {
            date: "Date".to_string(),
            title: "Name".to_string(),
            summary: "Summary".to_string(),
            url: "Link".to_string(),
        };
        let body = store(NOTION_API_BASE).with_schema(schema).page_body(&record());
        assert_eq!(body["properties"]["Name"]["title"][0]["text"]["content"], "Title A");
        assert!(body["properties"].get("제목").is_none());
    }

    #[test]
    fn test_long_text_is_split() {
        let long = "가".repeat(MAX_TEXT_CHARS * 2 + 5);
        let fragments = text_fragments(&long);
        assert_eq!(fragments.len(), 3);
        assert_eq!(
            fragments[2]["text"]["content"].as_str().unwrap().chars().count(),
            5
        );
    }

    #[test]
    fn test_fragment_count_is_capped() {
        let huge = "가".repeat(MAX_TEXT_CHARS * (MAX_TEXT_FRAGMENTS + 1) + 1);
        let fragments = text_fragments(&huge);
        assert_eq!(fragments.len(), MAX_TEXT_FRAGMENTS);
        assert!(
            fragments
                .iter()
                .all(|f| f["text"]["content"].as_str().unwrap().chars().count() == MAX_TEXT_CHARS)
        );

        let exact = "a".repeat(MAX_TEXT_CHARS * MAX_TEXT_FRAGMENTS);
        assert_eq!(text_fragments(&exact).len(), MAX_TEXT_FRAGMENTS);
    }

    #[tokio::test]
    async fn test_save_posts_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .and(header("authorization", "Bearer secret-token"))
            .and(header("notion-version", NOTION_VERSION))
            .and(body_partial_json(json!({ "parent": { "database_id": "db-123" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "object": "page" })))
            .expect(1)
            .mount(&server)
            .await;

        store(&server.uri()).save(&record()).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_surfaces_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(400).set_body_string("validation_error"))
            .mount(&server)
            .await;

        let err = store(&server.uri()).save(&record()).await.unwrap_err();
        match err {
            StoreError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "validation_error");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }
}
