//! Admin widget editor.
//!
//! Holds an in-memory copy of a parent's widget list and mutates it through
//! add / update / remove / reorder (plus drag, toggles and duplication).
//! Nothing is persisted until [`EditorState::save`], which writes the whole
//! list at once. A failed save keeps every pending change so it can be
//! retried as is.
//!
//! Per-widget lifecycle: `New → Saved ⇄ Modified`; removed saved widgets sit
//! in `pending_deletions` until the next successful save.

mod client;
mod storage;

pub use client::AdminClient;
pub use storage::{LocalStorage, StorageError, StorageResult, WidgetStorage};

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Device, ParentRef, Widget, WidgetConfig};
use crate::registry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("unknown widget type `{0}`")]
    UnknownType(String),
    #[error("no widget with id `{0}`")]
    NotFound(String),
    #[error("new order must list every widget exactly once")]
    InvalidOrder,
    #[error("position {index} is out of range for {len} widgets")]
    OutOfRange { index: usize, len: usize },
    #[error("no drag in progress")]
    NoDrag,
}

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetStatus {
    New,
    Saved,
    Modified,
}

/// Partial update for one widget. Absent fields are left alone.
///
/// An empty `title`/`subtitle`/`content` clears the field. `config` merges
/// key by key into the existing config; a `null` value removes that key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub config: Option<WidgetConfig>,
    pub is_visible: Option<bool>,
    pub show_on_desktop: Option<bool>,
    pub show_on_mobile: Option<bool>,
    pub is_draft: Option<bool>,
}

impl WidgetPatch {
    /// Patch touching only the given config keys.
    pub fn config(config: Value) -> Self {
        Self {
            config: match config {
                Value::Object(map) => Some(map),
                _ => None,
            },
            ..Self::default()
        }
    }

    fn apply_to(&self, widget: &mut Widget) {
        if let Some(v) = &self.title {
            widget.title = optional_text(v);
        }
        if let Some(v) = &self.subtitle {
            widget.subtitle = optional_text(v);
        }
        if let Some(v) = &self.content {
            widget.content = optional_text(v);
        }
        if let Some(config) = &self.config {
            merge_config(&mut widget.config, config);
        }
        if let Some(v) = self.is_visible {
            widget.is_visible = v;
        }
        if let Some(v) = self.show_on_desktop {
            widget.show_on_desktop = v;
        }
        if let Some(v) = self.show_on_mobile {
            widget.show_on_mobile = v;
        }
        if let Some(v) = self.is_draft {
            widget.is_draft = v;
        }
    }
}

fn optional_text(v: &str) -> Option<String> {
    (!v.is_empty()).then(|| v.to_string())
}

/// Shallow merge: patch keys replace, `null` removes, other keys survive.
pub fn merge_config(target: &mut WidgetConfig, patch: &WidgetConfig) {
    for (key, value) in patch {
        if value.is_null() {
            target.remove(key);
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// An in-progress drag: the widget being dragged and the slot it hovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    pub widget_id: String,
    pub over: Option<usize>,
}

/// Every editor mutation, for callers that drive the editor from events.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    Add {
        widget_type: String,
        at: Option<usize>,
    },
    Update {
        id: String,
        patch: WidgetPatch,
    },
    Remove(String),
    Reorder(Vec<String>),
    Move {
        from: usize,
        to: usize,
    },
    DragStart(String),
    DragOver(usize),
    Drop,
    DragCancel,
    ToggleVisible(String),
    ToggleDevice {
        id: String,
        device: Device,
    },
    ToggleDraft(String),
    Duplicate(String),
    Expand(String),
    Collapse,
}

/// Editing session for one parent's widget list.
#[derive(Debug, Clone)]
pub struct EditorState {
    parent: ParentRef,
    widgets: Vec<Widget>,
    status: HashMap<String, WidgetStatus>,
    pending_deletions: Vec<String>,
    /// Row whose config panel is open.
    pub expanded: Option<String>,
    drag: Option<DragState>,
    dirty: bool,
    /// Message from the last failed save, shown inline.
    pub save_error: Option<String>,
}

impl EditorState {
    /// Start editing a list as loaded from storage. A repeated id is
    /// replaced by a fresh one on the later widget, which then counts as
    /// new and leaves the session dirty.
    pub fn new(parent: ParentRef, widgets: Vec<Widget>) -> Self {
        let mut state = Self {
            parent,
            widgets: Vec::with_capacity(widgets.len()),
            status: HashMap::new(),
            pending_deletions: Vec::new(),
            expanded: None,
            drag: None,
            dirty: false,
            save_error: None,
        };
        for mut widget in widgets {
            if state.status.contains_key(&widget.id) {
                let id = state.fresh_id();
                tracing::warn!(
                    parent = %state.parent,
                    duplicate = %widget.id,
                    %id,
                    "duplicate widget id, assigned a new one"
                );
                widget.id = id.clone();
                state.status.insert(id, WidgetStatus::New);
                state.dirty = true;
            } else {
                state.status.insert(widget.id.clone(), WidgetStatus::Saved);
            }
            state.widgets.push(widget);
        }
        state
    }

    /// Load the current list from storage and start editing it.
    pub async fn load<S: WidgetStorage + ?Sized>(
        storage: &S,
        parent: ParentRef,
    ) -> StorageResult<Self> {
        let widgets = storage.load(&parent).await?;
        Ok(Self::new(parent, widgets))
    }

    pub fn parent(&self) -> &ParentRef {
        &self.parent
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn status(&self, id: &str) -> Option<WidgetStatus> {
        self.status.get(id).copied()
    }

    pub fn pending_deletions(&self) -> &[String] {
        &self.pending_deletions
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Dispatch one action.
    pub fn apply(&mut self, action: EditorAction) -> EditorResult<()> {
        match action {
            EditorAction::Add { widget_type, at } => self.add(&widget_type, at).map(drop),
            EditorAction::Update { id, patch } => self.update(&id, &patch),
            EditorAction::Remove(id) => self.remove(&id).map(drop),
            EditorAction::Reorder(order) => self.reorder(&order),
            EditorAction::Move { from, to } => self.move_widget(from, to),
            EditorAction::DragStart(id) => self.drag_start(&id),
            EditorAction::DragOver(index) => self.drag_over(index),
            EditorAction::Drop => self.drop_dragged().map(drop),
            EditorAction::DragCancel => {
                self.drag_cancel();
                Ok(())
            }
            EditorAction::ToggleVisible(id) => self.toggle_visible(&id).map(drop),
            EditorAction::ToggleDevice { id, device } => self.toggle_device(&id, device).map(drop),
            EditorAction::ToggleDraft(id) => self.toggle_draft(&id).map(drop),
            EditorAction::Duplicate(id) => self.duplicate(&id).map(drop),
            EditorAction::Expand(id) => self.expand(&id),
            EditorAction::Collapse => {
                self.collapse();
                Ok(())
            }
        }
    }

    // ── List mutations ────────────────────────────────────────────

    /// Insert a fresh widget of a registered type. `at` beyond the end (or
    /// `None`) appends. Returns the new id.
    pub fn add(&mut self, widget_type: &str, at: Option<usize>) -> EditorResult<String> {
        if !registry::is_known(widget_type) {
            return Err(EditorError::UnknownType(widget_type.to_string()));
        }
        let id = self.fresh_id();
        let index = at.unwrap_or(self.widgets.len()).min(self.widgets.len());
        self.widgets.insert(index, Widget::new(id.clone(), widget_type));
        self.status.insert(id.clone(), WidgetStatus::New);
        self.expanded = Some(id.clone());
        self.dirty = true;
        tracing::debug!(widget_type, index, "added widget");
        Ok(id)
    }

    pub fn update(&mut self, id: &str, patch: &WidgetPatch) -> EditorResult<()> {
        let widget = self.find_mut(id)?;
        patch.apply_to(widget);
        self.touch(id);
        Ok(())
    }

    /// Remove a widget. Saved widgets are recorded as pending deletions.
    pub fn remove(&mut self, id: &str) -> EditorResult<Widget> {
        let index = self.index_of(id)?;
        let widget = self.widgets.remove(index);
        if self.status.remove(id) != Some(WidgetStatus::New) {
            self.pending_deletions.push(id.to_string());
        }
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        }
        if self.drag.as_ref().is_some_and(|d| d.widget_id == id) {
            self.drag = None;
        }
        self.dirty = true;
        Ok(widget)
    }

    /// Replace the order with `order`, which must be a permutation of the
    /// current ids. Anything else leaves the list untouched.
    pub fn reorder(&mut self, order: &[String]) -> EditorResult<()> {
        if order.len() != self.widgets.len() {
            return Err(EditorError::InvalidOrder);
        }
        let mut seen = HashSet::with_capacity(order.len());
        if !order.iter().all(|id| seen.insert(id.as_str())) {
            return Err(EditorError::InvalidOrder);
        }

        let mut by_id: HashMap<&str, &Widget> =
            self.widgets.iter().map(|w| (w.id.as_str(), w)).collect();
        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            match by_id.remove(id.as_str()) {
                Some(w) => reordered.push(w.clone()),
                None => return Err(EditorError::InvalidOrder),
            }
        }

        let moved: Vec<String> = reordered
            .iter()
            .zip(&self.widgets)
            .filter(|(new, old)| new.id != old.id)
            .map(|(new, _)| new.id.clone())
            .collect();
        if moved.is_empty() {
            return Ok(());
        }
        self.widgets = reordered;
        for id in &moved {
            self.touch(id);
        }
        Ok(())
    }

    /// Move the widget at `from` so it ends up at index `to`.
    pub fn move_widget(&mut self, from: usize, to: usize) -> EditorResult<()> {
        let len = self.widgets.len();
        for index in [from, to] {
            if index >= len {
                return Err(EditorError::OutOfRange { index, len });
            }
        }
        let mut order: Vec<String> = self.widgets.iter().map(|w| w.id.clone()).collect();
        let id = order.remove(from);
        order.insert(to, id);
        self.reorder(&order)
    }

    /// Copy a widget (fields and config) right after the original.
    pub fn duplicate(&mut self, id: &str) -> EditorResult<String> {
        let index = self.index_of(id)?;
        let new_id = self.fresh_id();
        let mut copy = self.widgets[index].clone();
        copy.id = new_id.clone();
        self.widgets.insert(index + 1, copy);
        self.status.insert(new_id.clone(), WidgetStatus::New);
        self.dirty = true;
        Ok(new_id)
    }

    // ── Toggles ───────────────────────────────────────────────────

    /// Flip `isVisible`; returns the new value.
    pub fn toggle_visible(&mut self, id: &str) -> EditorResult<bool> {
        let w = self.find_mut(id)?;
        w.is_visible = !w.is_visible;
        let value = w.is_visible;
        self.touch(id);
        Ok(value)
    }

    /// Flip visibility on one device class; returns the new value.
    pub fn toggle_device(&mut self, id: &str, device: Device) -> EditorResult<bool> {
        let w = self.find_mut(id)?;
        let flag = match device {
            Device::Desktop => &mut w.show_on_desktop,
            Device::Mobile => &mut w.show_on_mobile,
        };
        *flag = !*flag;
        let value = *flag;
        self.touch(id);
        Ok(value)
    }

    /// Flip draft/live; returns whether the widget is now a draft.
    pub fn toggle_draft(&mut self, id: &str) -> EditorResult<bool> {
        let w = self.find_mut(id)?;
        w.is_draft = !w.is_draft;
        let value = w.is_draft;
        self.touch(id);
        Ok(value)
    }

    // ── Drag and drop ─────────────────────────────────────────────

    pub fn drag_start(&mut self, id: &str) -> EditorResult<()> {
        self.index_of(id)?;
        self.drag = Some(DragState {
            widget_id: id.to_string(),
            over: None,
        });
        Ok(())
    }

    /// Hover slot; clamped to the last index.
    pub fn drag_over(&mut self, index: usize) -> EditorResult<()> {
        let last = self.widgets.len().saturating_sub(1);
        let drag = self.drag.as_mut().ok_or(EditorError::NoDrag)?;
        drag.over = Some(index.min(last));
        Ok(())
    }

    /// Finish the drag as a full reorder. Returns whether anything moved.
    pub fn drop_dragged(&mut self) -> EditorResult<bool> {
        let drag = self.drag.take().ok_or(EditorError::NoDrag)?;
        let Some(to) = drag.over else {
            return Ok(false);
        };
        let from = self.index_of(&drag.widget_id)?;
        if from == to {
            return Ok(false);
        }
        self.move_widget(from, to)?;
        Ok(true)
    }

    pub fn drag_cancel(&mut self) {
        self.drag = None;
    }

    // ── Panels ────────────────────────────────────────────────────

    /// Open a row's config panel; opening the open row closes it.
    pub fn expand(&mut self, id: &str) -> EditorResult<()> {
        self.index_of(id)?;
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
        Ok(())
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    // ── Persistence ───────────────────────────────────────────────

    /// Persist the whole list. On success every widget is `Saved` and the
    /// session is clean; on failure the error is kept in `save_error` and
    /// nothing else changes.
    pub async fn save<S: WidgetStorage + ?Sized>(&mut self, storage: &S) -> StorageResult<()> {
        match storage.save(&self.parent, &self.widgets).await {
            Ok(()) => {
                for status in self.status.values_mut() {
                    *status = WidgetStatus::Saved;
                }
                self.pending_deletions.clear();
                self.dirty = false;
                self.save_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(parent = %self.parent, error = %e, "widget save failed");
                self.save_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ── Internals ─────────────────────────────────────────────────

    fn index_of(&self, id: &str) -> EditorResult<usize> {
        self.widgets
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))
    }

    fn find_mut(&mut self, id: &str) -> EditorResult<&mut Widget> {
        self.widgets
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))
    }

    /// Mark a widget changed since the last save.
    fn touch(&mut self, id: &str) {
        if let Some(status) = self.status.get_mut(id) {
            if *status == WidgetStatus::Saved {
                *status = WidgetStatus::Modified;
            }
        }
        self.dirty = true;
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if self.index_of(&id).is_err() && !self.pending_deletions.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_widget_list, serialize_widget_list, ParentKind};
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory storage with a switch to make saves fail.
    #[derive(Default)]
    struct MemoryStorage {
        saved: Mutex<Vec<Widget>>,
        fail: AtomicBool,
    }

    impl WidgetStorage for MemoryStorage {
        fn load<'a>(&'a self, _: &'a ParentRef) -> BoxFuture<'a, StorageResult<Vec<Widget>>> {
            let widgets = self.saved.lock().unwrap().clone();
            async move { Ok(widgets) }.boxed()
        }

        fn save<'a>(
            &'a self,
            _: &'a ParentRef,
            widgets: &'a [Widget],
        ) -> BoxFuture<'a, StorageResult<()>> {
            async move {
                if self.fail.load(Ordering::SeqCst) {
                    return Err(StorageError::Unavailable("network down".to_string()));
                }
                *self.saved.lock().unwrap() = widgets.to_vec();
                Ok(())
            }
            .boxed()
        }
    }

    fn home() -> ParentRef {
        ParentRef::new(ParentKind::Page, "home")
    }

    fn editor() -> EditorState {
        EditorState::new(
            home(),
            vec![
                Widget::new("a", "hero_carousel"),
                Widget::new("b", "marquee").with_config(json!({"text": "Hi", "speed": "fast"})),
                Widget::new("c", "faqs"),
            ],
        )
    }

    fn ids(state: &EditorState) -> Vec<&str> {
        state.widgets().iter().map(|w| w.id.as_str()).collect()
    }

    fn order(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // ── Add ───────────────────────────────────────────────────────

    #[test]
    fn new_editor_is_clean_and_saved() {
        let state = editor();
        assert!(!state.is_dirty());
        assert_eq!(state.status("a"), Some(WidgetStatus::Saved));
    }

    #[test]
    fn duplicate_ids_on_load_are_reassigned() {
        let mut editor = EditorState::new(
            ParentRef::new(ParentKind::Page, "home"),
            vec![
                Widget::new("a", "text"),
                Widget::new("a", "quote"),
                Widget::new("b", "spacer"),
            ],
        );
        let ids: HashSet<&str> = editor.widgets().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(editor.widgets()[0].id, "a");
        let twin = editor.widgets()[1].id.clone();
        assert_ne!(twin, "a");
        assert_eq!(editor.status(&twin), Some(WidgetStatus::New));
        assert!(editor.is_dirty());

        editor.remove("a").unwrap();
        assert_eq!(editor.pending_deletions(), ["a".to_string()]);
        assert!(editor.widgets().iter().all(|w| w.id != "a"));
        assert_eq!(editor.widgets()[0].widget_type, "quote");
    }

    #[test]
    fn add_inserts_fresh_visible_widget() {
        let mut state = editor();
        let id = state.add("spacer", Some(1)).unwrap();

        let w = &state.widgets()[1];
        assert_eq!(w.id, id);
        assert_eq!(w.widget_type, "spacer");
        assert!(w.is_visible);
        assert!(w.config.is_empty());
        assert_eq!(state.status(&id), Some(WidgetStatus::New));
        assert_eq!(state.expanded.as_deref(), Some(id.as_str()));
        assert!(state.is_dirty());
    }

    #[test]
    fn add_clamps_index_and_appends_by_default() {
        let mut state = editor();
        let far = state.add("text", Some(99)).unwrap();
        let end = state.add("quote", None).unwrap();
        assert_eq!(state.widgets()[3].id, far);
        assert_eq!(state.widgets()[4].id, end);
    }

    #[test]
    fn add_ids_are_unique() {
        let mut state = EditorState::new(home(), Vec::new());
        let mut seen = HashSet::new();
        for _ in 0..50 {
            assert!(seen.insert(state.add("text", Some(0)).unwrap()));
        }
    }

    #[test]
    fn add_rejects_unknown_type() {
        let mut state = editor();
        assert_eq!(
            state.add("carousel_3000", None),
            Err(EditorError::UnknownType("carousel_3000".to_string()))
        );
        assert_eq!(state.widgets().len(), 3);
        assert!(!state.is_dirty());
    }

    // ── Update ────────────────────────────────────────────────────

    #[test]
    fn config_merge_keeps_siblings() {
        let mut state = EditorState::new(
            home(),
            vec![Widget::new("x", "product_grid").with_config(json!({"a": 1, "b": 5}))],
        );
        state.update("x", &WidgetPatch::config(json!({"a": 2}))).unwrap();
        assert_eq!(
            Value::Object(state.widget("x").unwrap().config.clone()),
            json!({"a": 2, "b": 5})
        );
        assert_eq!(state.status("x"), Some(WidgetStatus::Modified));
    }

    #[test]
    fn null_config_value_removes_key() {
        let mut state = editor();
        state
            .update("b", &WidgetPatch::config(json!({"speed": null})))
            .unwrap();
        assert_eq!(
            Value::Object(state.widget("b").unwrap().config.clone()),
            json!({"text": "Hi"})
        );
    }

    #[test]
    fn update_fields_and_clear_with_empty() {
        let mut state = editor();
        let patch = WidgetPatch {
            title: Some("Questions".to_string()),
            is_draft: Some(true),
            ..WidgetPatch::default()
        };
        state.update("c", &patch).unwrap();
        let w = state.widget("c").unwrap();
        assert_eq!(w.title.as_deref(), Some("Questions"));
        assert!(w.is_draft);
        assert_eq!(w.config, WidgetConfig::new());

        let clear = WidgetPatch {
            title: Some(String::new()),
            ..WidgetPatch::default()
        };
        state.update("c", &clear).unwrap();
        assert_eq!(state.widget("c").unwrap().title, None);
    }

    #[test]
    fn patch_deserializes_from_camel_case() {
        let patch: WidgetPatch =
            serde_json::from_str(r#"{"showOnMobile": false, "config": {"columns": 3}}"#).unwrap();
        assert_eq!(patch.show_on_mobile, Some(false));
        assert_eq!(patch.config.unwrap()["columns"], 3);
        assert_eq!(patch.title, None);
    }

    #[test]
    fn update_unknown_id_fails() {
        let mut state = editor();
        assert_eq!(
            state.update("zzz", &WidgetPatch::default()),
            Err(EditorError::NotFound("zzz".to_string()))
        );
    }

    // ── Remove ────────────────────────────────────────────────────

    #[test]
    fn remove_saved_widget_records_deletion() {
        let mut state = editor();
        state.expanded = Some("b".to_string());
        let removed = state.remove("b").unwrap();
        assert_eq!(removed.widget_type, "marquee");
        assert_eq!(ids(&state), vec!["a", "c"]);
        assert_eq!(state.pending_deletions(), ["b".to_string()]);
        assert_eq!(state.expanded, None);
    }

    #[test]
    fn remove_new_widget_leaves_no_trace() {
        let mut state = editor();
        let id = state.add("text", None).unwrap();
        state.remove(&id).unwrap();
        assert!(state.pending_deletions().is_empty());
        assert_eq!(state.status(&id), None);
    }

    // ── Reorder ───────────────────────────────────────────────────

    #[test]
    fn reorder_preserves_fields() {
        let mut state = editor();
        let before = state.widgets().to_vec();
        state.reorder(&order(&["c", "a", "b"])).unwrap();
        assert_eq!(ids(&state), vec!["c", "a", "b"]);
        for w in state.widgets() {
            let old = before.iter().find(|o| o.id == w.id).unwrap();
            assert_eq!(w, old);
        }
        assert!(state.is_dirty());
    }

    #[test]
    fn reorder_rejects_non_permutations() {
        let mut state = editor();
        for bad in [
            order(&["a", "b"]),
            order(&["a", "b", "b"]),
            order(&["a", "b", "z"]),
            order(&["a", "b", "c", "d"]),
        ] {
            assert_eq!(state.reorder(&bad), Err(EditorError::InvalidOrder));
            assert_eq!(ids(&state), vec!["a", "b", "c"]);
        }
        assert!(!state.is_dirty());
    }

    #[test]
    fn reorder_to_same_order_is_a_no_op() {
        let mut state = editor();
        state.reorder(&order(&["a", "b", "c"])).unwrap();
        assert!(!state.is_dirty());
        assert_eq!(state.status("a"), Some(WidgetStatus::Saved));
    }

    #[test]
    fn move_widget_forward_and_back() {
        let mut state = editor();
        state.move_widget(0, 2).unwrap();
        assert_eq!(ids(&state), vec!["b", "c", "a"]);
        state.move_widget(2, 0).unwrap();
        assert_eq!(ids(&state), vec!["a", "b", "c"]);
        assert_eq!(
            state.move_widget(0, 3),
            Err(EditorError::OutOfRange { index: 3, len: 3 })
        );
    }

    // ── Drag and drop ─────────────────────────────────────────────

    #[test]
    fn drag_and_drop_reorders() {
        let mut state = editor();
        state.drag_start("c").unwrap();
        state.drag_over(0).unwrap();
        assert_eq!(state.drag().unwrap().over, Some(0));
        assert!(state.drop_dragged().unwrap());
        assert_eq!(ids(&state), vec!["c", "a", "b"]);
        assert!(state.drag().is_none());
    }

    #[test]
    fn drop_without_target_or_drag() {
        let mut state = editor();
        assert_eq!(state.drop_dragged(), Err(EditorError::NoDrag));
        assert_eq!(state.drag_over(1), Err(EditorError::NoDrag));

        state.drag_start("a").unwrap();
        assert!(!state.drop_dragged().unwrap());
        assert!(!state.is_dirty());

        state.drag_start("a").unwrap();
        state.drag_over(50).unwrap();
        state.drag_cancel();
        assert!(state.drag().is_none());
        assert_eq!(ids(&state), vec!["a", "b", "c"]);
    }

    // ── Toggles, duplicate, panels ────────────────────────────────

    #[test]
    fn toggles_flip_independently() {
        let mut state = editor();
        assert!(!state.toggle_visible("a").unwrap());
        assert!(!state.toggle_device("a", Device::Mobile).unwrap());
        assert!(state.toggle_draft("a").unwrap());
        let w = state.widget("a").unwrap();
        assert!(!w.is_visible);
        assert!(w.show_on_desktop);
        assert!(!w.show_on_mobile);
        assert!(w.is_draft);
        assert_eq!(ids(&state), vec!["a", "b", "c"]);
    }

    #[test]
    fn duplicate_copies_after_original() {
        let mut state = editor();
        let copy = state.duplicate("b").unwrap();
        assert_eq!(ids(&state), vec!["a", "b", copy.as_str(), "c"]);
        assert_eq!(state.widgets()[2].config, state.widgets()[1].config);
        assert_eq!(state.status(&copy), Some(WidgetStatus::New));
    }

    #[test]
    fn expand_toggles_panel() {
        let mut state = editor();
        state.expand("a").unwrap();
        assert_eq!(state.expanded.as_deref(), Some("a"));
        state.expand("a").unwrap();
        assert_eq!(state.expanded, None);
        state.expand("b").unwrap();
        state.collapse();
        assert_eq!(state.expanded, None);
        assert!(state.expand("zzz").is_err());
    }

    #[test]
    fn actions_drive_the_same_operations() {
        let mut state = editor();
        state
            .apply(EditorAction::Add {
                widget_type: "newsletter".to_string(),
                at: Some(0),
            })
            .unwrap();
        state.apply(EditorAction::Remove("c".to_string())).unwrap();
        state.apply(EditorAction::Move { from: 0, to: 2 }).unwrap();
        assert_eq!(state.widgets()[2].widget_type, "newsletter");
        assert_eq!(
            state.apply(EditorAction::Reorder(order(&["a"]))),
            Err(EditorError::InvalidOrder)
        );
    }

    // ── Save ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn save_marks_everything_saved() {
        let storage = MemoryStorage::default();
        let mut state = editor();
        let id = state.add("text", None).unwrap();
        state.update("a", &WidgetPatch::config(json!({"autoplay": false}))).unwrap();
        state.remove("c").unwrap();

        state.save(&storage).await.unwrap();

        assert!(!state.is_dirty());
        assert!(state.pending_deletions().is_empty());
        assert_eq!(state.status(&id), Some(WidgetStatus::Saved));
        assert_eq!(state.status("a"), Some(WidgetStatus::Saved));
        assert_eq!(*storage.saved.lock().unwrap(), state.widgets().to_vec());
    }

    #[tokio::test]
    async fn failed_save_preserves_state_for_retry() {
        let storage = MemoryStorage::default();
        storage.fail.store(true, Ordering::SeqCst);
        let mut state = editor();
        state.remove("a").unwrap();
        state.update("b", &WidgetPatch::config(json!({"text": "Bye"}))).unwrap();
        let before = state.widgets().to_vec();

        assert!(state.save(&storage).await.is_err());
        assert_eq!(state.save_error.as_deref(), Some("network down"));
        assert!(state.is_dirty());
        assert_eq!(state.widgets(), before.as_slice());
        assert_eq!(state.pending_deletions(), ["a".to_string()]);
        assert_eq!(state.status("b"), Some(WidgetStatus::Modified));
        assert!(storage.saved.lock().unwrap().is_empty());

        storage.fail.store(false, Ordering::SeqCst);
        state.save(&storage).await.unwrap();
        assert_eq!(state.save_error, None);
        assert_eq!(*storage.saved.lock().unwrap(), before);
    }

    #[tokio::test]
    async fn edits_round_trip_through_persisted_json() {
        let storage = MemoryStorage::default();
        let mut state = editor();
        state.toggle_device("c", Device::Desktop).unwrap();
        state.save(&storage).await.unwrap();

        let json = serialize_widget_list(&storage.saved.lock().unwrap()).unwrap();
        assert_eq!(parse_widget_list(&json), state.widgets().to_vec());

        let reloaded = EditorState::load(&storage, home()).await.unwrap();
        assert_eq!(reloaded.widgets(), state.widgets());
        assert!(!reloaded.is_dirty());
    }
}
