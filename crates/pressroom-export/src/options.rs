//! Renderer options: the key/value configuration handed to `wkhtmltopdf`.

use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod keys {
    pub const PAGE_WIDTH: &str = "page-width";
    pub const PAGE_HEIGHT: &str = "page-height";
    pub const MARGIN_TOP: &str = "margin-top";
    pub const MARGIN_RIGHT: &str = "margin-right";
    pub const MARGIN_BOTTOM: &str = "margin-bottom";
    pub const MARGIN_LEFT: &str = "margin-left";
    pub const ENCODING: &str = "encoding";
    pub const ORIENTATION: &str = "orientation";
    pub const DPI: &str = "dpi";
    pub const NO_OUTLINE: &str = "no-outline";
    pub const NO_STOP_SLOW_SCRIPTS: &str = "no-stop-slow-scripts";
    pub const ENABLE_LOCAL_FILE_ACCESS: &str = "enable-local-file-access";
    pub const HEADER_HTML: &str = "header-html";
    pub const FOOTER_HTML: &str = "footer-html";
}

pub const DEFAULT_ENCODING: &str = "UTF-8";
pub const DEFAULT_ORIENTATION: &str = "Portrait";
pub const DEFAULT_DPI: i64 = 300;

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Number(i64),
    /// `true` emits the bare flag, `false` omits the option entirely.
    Switch(bool),
    /// Flag with no value.
    Flag,
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Switch(value)
    }
}

impl From<&Path> for OptionValue {
    fn from(value: &Path) -> Self {
        OptionValue::Text(value.display().to_string())
    }
}

/// Page geometry as CSS-like lengths (`21cm`, `0.75in`, ...).
///
/// Defaults to A4 with a `2in` top margin and `0.75in` elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub page_width: String,
    pub page_height: String,
    pub margin_top: String,
    pub margin_right: String,
    pub margin_bottom: String,
    pub margin_left: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: "21cm".to_string(),
            page_height: "29.7cm".to_string(),
            margin_top: "2in".to_string(),
            margin_right: "0.75in".to_string(),
            margin_bottom: "0.75in".to_string(),
            margin_left: "0.75in".to_string(),
        }
    }
}

impl PageLayout {
    /// Set the left and right margins together.
    pub fn with_horizontal_margin(mut self, margin: impl Into<String>) -> Self {
        let margin = margin.into();
        self.margin_left = margin.clone();
        self.margin_right = margin;
        self
    }
}

/// Ordered renderer options.
///
/// Built by value: every `with` consumes the options and returns the
/// updated set, so staging steps hand the options back instead of writing
/// through a shared reference. Setting an existing key replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RendererOptions {
    entries: Vec<(String, OptionValue)>,
}

impl RendererOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout geometry followed by the fixed defaults: UTF-8, portrait,
    /// 300 dpi, no outline, slow scripts never stopped, local file access.
    pub fn for_layout(layout: &PageLayout) -> Self {
        Self::new()
            .with(keys::PAGE_WIDTH, layout.page_width.as_str())
            .with(keys::PAGE_HEIGHT, layout.page_height.as_str())
            .with(keys::MARGIN_TOP, layout.margin_top.as_str())
            .with(keys::MARGIN_RIGHT, layout.margin_right.as_str())
            .with(keys::MARGIN_BOTTOM, layout.margin_bottom.as_str())
            .with(keys::MARGIN_LEFT, layout.margin_left.as_str())
            .with(keys::ENCODING, DEFAULT_ENCODING)
            .with(keys::ORIENTATION, DEFAULT_ORIENTATION)
            .with(keys::DPI, DEFAULT_DPI)
            .with(keys::NO_OUTLINE, OptionValue::Flag)
            .with(keys::NO_STOP_SLOW_SCRIPTS, true)
            .with(keys::ENABLE_LOCAL_FILE_ACCESS, true)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Command-line arguments in insertion order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.entries.len() * 2);
        for (key, value) in &self.entries {
            let flag = if key.starts_with("--") {
                key.clone()
            } else {
                format!("--{key}")
            };
            match value {
                OptionValue::Text(text) => {
                    args.push(flag);
                    args.push(text.clone());
                }
                OptionValue::Number(number) => {
                    args.push(flag);
                    args.push(number.to_string());
                }
                OptionValue::Switch(true) | OptionValue::Flag => args.push(flag),
                OptionValue::Switch(false) => {}
            }
        }
        args
    }
}
