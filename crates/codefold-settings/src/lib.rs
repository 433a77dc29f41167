#![warn(missing_docs)]
//! `codefold-settings` - persisted configuration for the `codefold` crates.
//!
//! This crate intentionally stays small and does **not** depend on the folding engine. It owns
//! the on-disk shape of the settings (a JSON object with camelCase keys), tolerant loading, and
//! the sanitization rules applied before values reach a view:
//!
//! - icons are trimmed and must be one or two grapheme clusters, otherwise the default icon is used
//! - `collapsedLines` is clamped to `>= 0`
//! - unknown `buttonAlignment` values fall back to `left`

mod error;

pub use error::SettingsError;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

/// Default icon shown on an expanded block (activating it collapses the block).
pub const DEFAULT_COLLAPSE_ICON: &str = "▼";
/// Default icon shown on a collapsed block (activating it expands the block).
pub const DEFAULT_EXPAND_ICON: &str = "▶";
/// Maximum icon length, in grapheme clusters.
pub const MAX_ICON_GRAPHEMES: usize = 2;

/// Which side of a code block the fold button is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAlignment {
    /// Button on the left edge.
    #[default]
    Left,
    /// Button on the right edge.
    Right,
}

impl ButtonAlignment {
    /// Parse an alignment name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// The persisted name of this alignment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for ButtonAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ButtonAlignment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_else(|| {
            warn!(value = %raw, "unknown buttonAlignment, using left");
            Self::Left
        }))
    }
}

/// Settings as persisted by the host.
///
/// Every key is optional on disk; missing keys take their [`Default`] value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeFoldSettings {
    /// Whether code blocks start collapsed when no front-matter override exists.
    pub default_collapsed: bool,
    /// Icon shown while a block is expanded.
    pub collapse_icon: String,
    /// Icon shown while a block is collapsed.
    pub expand_icon: String,
    /// Whether long lines scroll horizontally instead of wrapping.
    pub enable_horizontal_scroll: bool,
    /// Number of content lines kept visible in a collapsed block.
    ///
    /// Stored signed so that hand-edited negative values load and can be clamped.
    #[serde(deserialize_with = "deserialize_line_count")]
    pub collapsed_lines: i64,
    /// Fold button placement.
    pub button_alignment: ButtonAlignment,
    /// Whether the fold button is drawn without a background.
    pub transparent_button: bool,
}

impl Default for CodeFoldSettings {
    fn default() -> Self {
        Self {
            default_collapsed: false,
            collapse_icon: DEFAULT_COLLAPSE_ICON.to_string(),
            expand_icon: DEFAULT_EXPAND_ICON.to_string(),
            enable_horizontal_scroll: true,
            collapsed_lines: 0,
            button_alignment: ButtonAlignment::Left,
            transparent_button: false,
        }
    }
}

impl CodeFoldSettings {
    /// Parse settings from a JSON document.
    ///
    /// `null` (what a host returns for "no data yet") yields the defaults. The result is sanitized.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let parsed: Option<Self> = serde_json::from_str(json)?;
        Ok(parsed.unwrap_or_default().sanitized())
    }

    /// Serialize settings to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json_str(&json),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "settings file missing, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Save sanitized settings as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = self.sanitized().to_json_string()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Return a copy with every value inside its accepted bounds.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.collapse_icon = sanitize_icon(&self.collapse_icon, DEFAULT_COLLAPSE_ICON);
        out.expand_icon = sanitize_icon(&self.expand_icon, DEFAULT_EXPAND_ICON);
        if self.collapsed_lines < 0 {
            warn!(
                value = self.collapsed_lines,
                "collapsedLines is negative, clamping to 0"
            );
            out.collapsed_lines = 0;
        }
        out
    }

    /// `collapsedLines` as a count, clamped to zero.
    pub fn collapsed_line_count(&self) -> usize {
        usize::try_from(self.collapsed_lines.max(0)).unwrap_or(usize::MAX)
    }
}

/// Trim an icon and check it is one or two grapheme clusters; otherwise return `fallback`.
pub fn sanitize_icon(icon: &str, fallback: &str) -> String {
    let trimmed = icon.trim();
    let graphemes = trimmed.graphemes(true).count();
    if graphemes == 0 || graphemes > MAX_ICON_GRAPHEMES {
        warn!(icon = %icon, fallback, "icon rejected");
        return fallback.to_string();
    }
    trimmed.to_string()
}

fn deserialize_line_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Lenient::deserialize(deserializer)? {
        Lenient::Int(n) => Ok(n),
        Lenient::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
        Lenient::Float(f) => Err(de::Error::custom(format!("invalid line count {f}"))),
        Lenient::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("invalid line count {s:?}"))),
    }
}
