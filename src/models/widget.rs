use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type-specific options carried by a widget instance.
pub type WidgetConfig = Map<String, Value>;

/// One configurable unit of page content.
///
/// This is the persisted shape: a parent row's `widgets` column holds a JSON
/// array of these, and the array index is the widget's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Rich text, emitted as authored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub config: WidgetConfig,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default = "default_true")]
    pub show_on_desktop: bool,
    #[serde(default = "default_true")]
    pub show_on_mobile: bool,
    /// Draft widgets only render in preview.
    #[serde(default)]
    pub is_draft: bool,
}

fn default_true() -> bool {
    true
}

impl Widget {
    /// A visible, live widget with an empty config.
    pub fn new(id: impl Into<String>, widget_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            widget_type: widget_type.into(),
            title: None,
            subtitle: None,
            content: None,
            config: WidgetConfig::new(),
            is_visible: true,
            show_on_desktop: true,
            show_on_mobile: true,
            is_draft: false,
        }
    }

    /// Builder-style helper to attach config.
    pub fn with_config(mut self, config: Value) -> Self {
        if let Value::Object(map) = config {
            self.config = map;
        }
        self
    }

    /// Builder-style helper to set the visibility flag.
    pub fn visible(mut self, is_visible: bool) -> Self {
        self.is_visible = is_visible;
        self
    }

    pub fn is_shown_on(&self, device: Device) -> bool {
        match device {
            Device::Desktop => self.show_on_desktop,
            Device::Mobile => self.show_on_mobile,
        }
    }
}

/// Viewport class a page is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Desktop => write!(f, "desktop"),
            Device::Mobile => write!(f, "mobile"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device {0:?} (desktop, mobile)")]
pub struct UnknownDevice(pub String);

impl FromStr for Device {
    type Err = UnknownDevice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Device::Desktop),
            "mobile" => Ok(Device::Mobile),
            _ => Err(UnknownDevice(s.to_string())),
        }
    }
}

/// Parse a persisted widget column.
///
/// Never fails: malformed JSON or a non-array value yields an empty list,
/// and individual malformed elements are dropped. Both cases are logged.
pub fn parse_widget_list(raw: &str) -> Vec<Widget> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(Value::Null) => return Vec::new(),
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "widget column is not an array, ignoring");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "malformed widget JSON, treating as empty");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Widget>(item) {
            Ok(widget) => Some(widget),
            Err(e) => {
                tracing::warn!(index, error = %e, "dropping malformed widget");
                None
            }
        })
        .collect()
}

/// Serialize a widget list for persistence.
pub fn serialize_widget_list(widgets: &[Widget]) -> serde_json::Result<String> {
    serde_json::to_string(widgets)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
