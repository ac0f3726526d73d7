//! Request handling: public page renders and the admin widget API.

use std::sync::Arc;

use serde_json::json;

use super::routes::{route, Route};
use crate::editor::{LocalStorage, StorageError, WidgetStorage};
use crate::models::{parse_widget_list, ParentKind, ParentRef, Widget};
use crate::registry;
use crate::render::{render_page, render_with, RenderContext, RenderOutput};
use crate::resolver::{
    resolve_for, InstagramFeed, SharedStore, SiteSource, SourceError, SourceResult,
};
use crate::store::ParentRow;
use crate::utils::escape_html;

/// An HTTP reply, independent of the server library.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8",
            body,
        }
    }

    fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    pub(crate) fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "error": message.into() }).to_string())
    }
}

/// A rendered document plus what the renderer left out.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub output: RenderOutput,
}

pub struct Site {
    store: SharedStore,
    source: SiteSource,
    storage: LocalStorage,
}

impl Site {
    pub fn new(store: SharedStore, instagram: Option<InstagramFeed>) -> Self {
        Self {
            source: SiteSource::new(Arc::clone(&store), instagram),
            storage: LocalStorage::new(Arc::clone(&store)),
            store,
        }
    }

    pub async fn handle(&self, method: &str, url: &str, body: &str) -> Reply {
        match route(method, url) {
            Route::Render { parent, ctx } => match self.render_parent(&parent, &ctx).await {
                Ok(Some(page)) => Reply::html(200, page.html),
                Ok(None) => Reply::html(404, not_found_page(&parent)),
                Err(e) => {
                    tracing::error!(parent = %parent, "render failed: {}", e);
                    Reply::html(500, "<h1>500</h1>".to_string())
                }
            },
            Route::WidgetTypes { query } => {
                let groups = match query {
                    Some(q) => registry::search(&q),
                    None => registry::by_category(),
                };
                to_json(200, &groups)
            }
            Route::ListWidgets(parent) => match self.storage.load(&parent).await {
                Ok(widgets) => to_json(200, &widgets),
                Err(e) => storage_failure(&parent, e),
            },
            Route::SaveWidgets(parent) => self.save(&parent, body).await,
            Route::MethodNotAllowed => Reply::error(405, "method not allowed"),
            Route::NotFound => Reply::error(404, "not found"),
        }
    }

    /// Load, resolve and render one parent. `Ok(None)` when it doesn't exist,
    /// or when it is an inactive product or unpublished post outside preview.
    pub async fn render_parent(
        &self,
        parent: &ParentRef,
        ctx: &RenderContext,
    ) -> SourceResult<Option<RenderedPage>> {
        let Some(row) = self.load_row(parent).await? else {
            return Ok(None);
        };
        if !row.is_live && !ctx.preview {
            tracing::debug!(parent = %parent, "not live, hiding from public render");
            return Ok(None);
        }
        let widgets = parse_widget_list(&row.widgets_raw);
        let data = resolve_for(&self.source, &widgets).await;
        let output = render_with(&widgets, &data, ctx);

        let body = match parent.kind {
            ParentKind::Page => None,
            ParentKind::Product if row.body.trim().is_empty() => None,
            ParentKind::Product => Some(format!("<p>{}</p>", escape_html(&row.body))),
            ParentKind::BlogPost => Some(row.body.clone()),
        };
        let html = render_page(&row.title, body.as_deref(), &output.nodes, &data.settings);
        Ok(Some(RenderedPage { html, output }))
    }

    async fn load_row(&self, parent: &ParentRef) -> SourceResult<Option<ParentRow>> {
        let store = Arc::clone(&self.store);
        let parent = parent.clone();
        tokio::task::spawn_blocking(move || -> SourceResult<Option<ParentRow>> {
            let guard = store
                .lock()
                .map_err(|_| SourceError::Unavailable("content store lock poisoned".into()))?;
            Ok(guard.load_parent(&parent)?)
        })
        .await?
    }

    /// Replace a parent's list. The body must be a complete, well-formed
    /// widget array; nothing is written otherwise.
    async fn save(&self, parent: &ParentRef, body: &str) -> Reply {
        let widgets: Vec<Widget> = match serde_json::from_str(body) {
            Ok(w) => w,
            Err(e) => return Reply::error(400, format!("invalid widget list: {}", e)),
        };
        if let Some(id) = duplicate_id(&widgets) {
            return Reply::error(400, format!("duplicate widget id: {}", id));
        }
        match self.storage.save(parent, &widgets).await {
            Ok(()) => to_json(200, &json!({ "saved": widgets.len() })),
            Err(e) => storage_failure(parent, e),
        }
    }
}

fn duplicate_id(widgets: &[Widget]) -> Option<&str> {
    let mut seen = std::collections::HashSet::new();
    widgets
        .iter()
        .map(|w| w.id.as_str())
        .find(|id| !seen.insert(*id))
}

fn storage_failure(parent: &ParentRef, err: StorageError) -> Reply {
    match err {
        StorageError::NotFound(_) => Reply::error(404, format!("{} not found", parent)),
        other => {
            tracing::error!(parent = %parent, "widget storage failed: {}", other);
            Reply::error(500, other.to_string())
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(status: u16, value: &T) -> Reply {
    match serde_json::to_string(value) {
        Ok(body) => Reply::json(status, body),
        Err(e) => Reply::error(500, e.to_string()),
    }
}

fn not_found_page(parent: &ParentRef) -> String {
    format!(
        "<!DOCTYPE html>\n<html><body><h1>404</h1><p>{}</p></body></html>\n",
        escape_html(&t!("cli.not_found", parent = parent.to_string()))
    )
}
