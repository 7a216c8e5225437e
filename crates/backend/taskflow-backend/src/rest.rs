//! Row API client for the tasks table.

use crate::api::{AccessTokenProvider, TaskTable};
use crate::config::BackendConfig;
use crate::error::BackendResult;
use crate::http::{APIKEY_HEADER, expect_success, read_json};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder};
use std::sync::Arc;
use taskflow_core::{NewTask, Task, TaskId, TaskUpdate};
use tracing::debug;
use url::Url;

/// Asks the row API to answer with a single object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

pub struct RestTaskTable {
    http: Client,
    config: Arc<BackendConfig>,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl RestTaskTable {
    pub fn new(
        http: Client,
        config: Arc<BackendConfig>,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            http,
            config,
            tokens,
        }
    }

    /// Request with the API key and the caller's bearer token; signed-out callers
    /// present the anonymous key instead.
    async fn request(&self, method: Method, url: Url) -> BackendResult<RequestBuilder> {
        let bearer = self
            .tokens
            .access_token()
            .await?
            .unwrap_or_else(|| self.config.anon_key.clone());

        Ok(self
            .http
            .request(method, url)
            .header(APIKEY_HEADER, &self.config.anon_key)
            .bearer_auth(bearer))
    }

    fn row_url(&self, id: TaskId) -> BackendResult<Url> {
        let mut url = self.config.table_endpoint()?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }

    fn returning_row(request: RequestBuilder) -> RequestBuilder {
        request
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .header(ACCEPT, SINGLE_OBJECT)
    }
}

#[async_trait]
impl TaskTable for RestTaskTable {
    async fn select_all(&self) -> BackendResult<Vec<Task>> {
        let mut url = self.config.table_endpoint()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        let response = self.request(Method::GET, url).await?.send().await?;
        let tasks: Vec<Task> = read_json(response).await?;
        debug!("Fetched {} task rows", tasks.len());
        Ok(tasks)
    }

    async fn insert(&self, row: &NewTask) -> BackendResult<Task> {
        let mut url = self.config.table_endpoint()?;
        url.query_pairs_mut().append_pair("select", "*");

        let request = self.request(Method::POST, url).await?.json(&[row]);
        let response = Self::returning_row(request).send().await?;
        let task: Task = read_json(response).await?;
        debug!("Inserted task {}", task.id);
        Ok(task)
    }

    async fn update(&self, id: TaskId, changes: &TaskUpdate) -> BackendResult<Task> {
        let mut url = self.row_url(id)?;
        url.query_pairs_mut().append_pair("select", "*");

        let request = self.request(Method::PATCH, url).await?.json(changes);
        let response = Self::returning_row(request).send().await?;
        let task: Task = read_json(response).await?;
        debug!("Updated task {}", task.id);
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> BackendResult<()> {
        let url = self.row_url(id)?;
        let response = self.request(Method::DELETE, url).await?.send().await?;
        expect_success(response).await?;
        debug!("Deleted task {}", id);
        Ok(())
    }
}
