//! HTTP client for a running site's admin widget API.

use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::{Client, StatusCode};
use url::Url;

use super::storage::{StorageError, StorageResult, WidgetStorage};
use crate::constants::DEFAULT_FETCH_TIMEOUT_SECS;
use crate::models::{parse_widget_list, ParentRef, Widget};

/// Talks to `/admin/api/{kind}/{slug}/widgets` on a remote server.
pub struct AdminClient {
    base_url: String,
    client: Client,
}

impl AdminClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Endpoint for one parent's list. The slug is escaped as a single path
    /// segment.
    pub fn widgets_url(&self, parent: &ParentRef) -> StorageResult<Url> {
        let invalid = || StorageError::Unavailable(format!("invalid admin url {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["admin", "api", parent.kind.segment(), parent.slug.as_str(), "widgets"]);
        Ok(url)
    }

    async fn fetch(&self, parent: &ParentRef) -> StorageResult<Vec<Widget>> {
        let resp = self.client.get(self.widgets_url(parent)?).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(parent.clone()));
        }
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(parse_widget_list(&text))
    }

    async fn store(&self, parent: &ParentRef, widgets: &[Widget]) -> StorageResult<()> {
        let resp = self
            .client
            .put(self.widgets_url(parent)?)
            .json(widgets)
            .send()
            .await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(parent.clone()));
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        tracing::info!(parent = %parent, count = widgets.len(), "saved widget list remotely");
        Ok(())
    }
}

impl WidgetStorage for AdminClient {
    fn load<'a>(&'a self, parent: &'a ParentRef) -> BoxFuture<'a, StorageResult<Vec<Widget>>> {
        self.fetch(parent).boxed()
    }

    fn save<'a>(
        &'a self,
        parent: &'a ParentRef,
        widgets: &'a [Widget],
    ) -> BoxFuture<'a, StorageResult<()>> {
        self.store(parent, widgets).boxed()
    }
}
