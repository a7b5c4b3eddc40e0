use crate::errors::StoreError;
use crate::filter::Filter;
use crate::metrics_defs::STORE_REQUEST_DURATION;
use crate::patch::PropertyPatches;
use crate::schema::{Collection, QueryResponse, Row};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Instant;

pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// The operations handlers need from the document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All rows of a database matching `filter`, across every result page.
    async fn query_rows(&self, database_id: &str, filter: &Filter) -> Result<Vec<Row>, StoreError>;

    /// Sets the given properties on a row and returns the updated row.
    async fn patch_row(
        &self,
        row_id: &str,
        properties: &PropertyPatches,
    ) -> Result<Row, StoreError>;

    async fn get_collection(&self, database_id: &str) -> Result<Collection, StoreError>;
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    filter: &'a Filter,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

#[derive(Serialize)]
struct PatchRequest<'a> {
    properties: &'a PropertyPatches,
}

#[derive(Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: Url,
    token: String,
    version: String,
}

impl NotionClient {
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let base_url =
            Url::parse(base_url).map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }

        Ok(NotionClient {
            client: reqwest::Client::new(),
            base_url,
            token: token.into(),
            version: version.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, StoreError> {
        let start = Instant::now();
        let result = execute(request).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(_) => "failure",
        };
        shared::histogram!(STORE_REQUEST_DURATION, "operation" => operation, "outcome" => outcome)
            .record(start.elapsed().as_secs_f64());

        result
    }
}

async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, StoreError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.bytes().await?;
        return Err(StoreError::from_status(status, &body));
    }
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl DocumentStore for NotionClient {
    async fn query_rows(&self, database_id: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        let url = self.endpoint(&["databases", database_id, "query"])?;
        let mut rows = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = QueryRequest {
                filter,
                start_cursor: cursor.as_deref(),
            };
            let page: QueryResponse = self
                .send("query", self.request(Method::POST, url.clone()).json(&body))
                .await?;

            rows.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more && cursor.as_deref() != Some(next.as_str()) => {
                    cursor = Some(next)
                }
                Some(next) if page.has_more => {
                    tracing::warn!(database_id, cursor = %next, "Cursor did not advance, stopping");
                    break;
                }
                _ => break,
            }
        }

        tracing::debug!(database_id, rows = rows.len(), "Queried database");
        Ok(rows)
    }

    async fn patch_row(
        &self,
        row_id: &str,
        properties: &PropertyPatches,
    ) -> Result<Row, StoreError> {
        let url = self.endpoint(&["pages", row_id])?;
        let body = PatchRequest { properties };
        self.send("patch", self.request(Method::PATCH, url).json(&body))
            .await
    }

    async fn get_collection(&self, database_id: &str) -> Result<Collection, StoreError> {
        let url = self.endpoint(&["databases", database_id])?;
        self.send("get_collection", self.request(Method::GET, url))
            .await
    }
}
