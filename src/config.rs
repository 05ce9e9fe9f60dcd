use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::workflow::{EdgeStyle, Position};

/// Editor tunables. Every field has a default, so a config file only needs
/// the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub layout: LayoutConfig,
    pub edges: EdgeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Where the first appended step lands.
    pub origin: Position,
    pub vertical_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin: Position::new(250.0, 100.0),
            vertical_spacing: 150.0,
        }
    }
}

/// Presentation attributes stamped on edges created through `connect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub animated: bool,
    pub stroke: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            animated: true,
            stroke: "#6366f1".to_string(),
        }
    }
}

impl EdgeConfig {
    pub fn style(&self) -> EdgeStyle {
        EdgeStyle {
            stroke: self.stroke.clone(),
        }
    }
}

impl EditorConfig {
    /// Loads a YAML or JSON config, chosen by file extension (YAML otherwise).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file from {}", path.display()))?;

        let config: EditorConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to deserialize JSON config from {}", path.display()))?,
            _ => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to deserialize YAML config from {}", path.display()))?,
        };
        Ok(config)
    }
}
