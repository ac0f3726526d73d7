//! Persistence seam for the editor: load and save a parent's whole widget list.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::models::{parse_widget_list, ParentRef, Widget};
use crate::resolver::SharedStore;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{0} does not exist")]
    NotFound(ParentRef),
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered HTTP {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("{0}")]
    Unavailable(String),
}

/// Where a widget list lives. A save replaces the whole list.
pub trait WidgetStorage: Send + Sync {
    fn load<'a>(&'a self, parent: &'a ParentRef) -> BoxFuture<'a, StorageResult<Vec<Widget>>>;
    fn save<'a>(
        &'a self,
        parent: &'a ParentRef,
        widgets: &'a [Widget],
    ) -> BoxFuture<'a, StorageResult<()>>;
}

/// Storage backed directly by the local content database.
#[derive(Clone)]
pub struct LocalStorage {
    store: SharedStore,
}

impl LocalStorage {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl WidgetStorage for LocalStorage {
    fn load<'a>(&'a self, parent: &'a ParentRef) -> BoxFuture<'a, StorageResult<Vec<Widget>>> {
        let store = Arc::clone(&self.store);
        let parent = parent.clone();
        async move {
            tokio::task::spawn_blocking(move || -> StorageResult<Vec<Widget>> {
                let guard = store
                    .lock()
                    .map_err(|_| StorageError::Unavailable("content store lock poisoned".into()))?;
                match guard.load_widgets_raw(&parent)? {
                    Some(raw) => Ok(parse_widget_list(&raw)),
                    None => Err(StorageError::NotFound(parent)),
                }
            })
            .await?
        }
        .boxed()
    }

    fn save<'a>(
        &'a self,
        parent: &'a ParentRef,
        widgets: &'a [Widget],
    ) -> BoxFuture<'a, StorageResult<()>> {
        let store = Arc::clone(&self.store);
        let parent = parent.clone();
        let widgets = widgets.to_vec();
        async move {
            tokio::task::spawn_blocking(move || -> StorageResult<()> {
                let guard = store
                    .lock()
                    .map_err(|_| StorageError::Unavailable("content store lock poisoned".into()))?;
                if guard.save_widgets(&parent, &widgets)? {
                    tracing::info!(parent = %parent, count = widgets.len(), "saved widget list");
                    Ok(())
                } else {
                    Err(StorageError::NotFound(parent))
                }
            })
            .await?
        }
        .boxed()
    }
}
