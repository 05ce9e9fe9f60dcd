use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::WorkflowError;
use crate::workflow::Workflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// `.yaml`/`.yml` are YAML, anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

pub fn to_string(workflow: &Workflow, format: Format) -> Result<String, WorkflowError> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(workflow)?,
        Format::Yaml => serde_yaml::to_string(workflow)?,
    })
}

/// Parses and validates a workflow record.
pub fn from_str(content: &str, format: Format) -> Result<Workflow, WorkflowError> {
    let workflow: Workflow = match format {
        Format::Json => serde_json::from_str(content)?,
        Format::Yaml => serde_yaml::from_str(content)?,
    };
    workflow.validate()?;
    Ok(workflow)
}

pub fn load_workflow(path: impl AsRef<Path>) -> Result<Workflow> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read workflow file from {}", path.display()))?;

    let workflow = from_str(&content, Format::from_path(path))
        .with_context(|| format!("Failed to load workflow from {}", path.display()))?;

    Ok(workflow)
}

pub fn write_workflow(path: impl AsRef<Path>, workflow: &Workflow) -> Result<()> {
    let path = path.as_ref();
    let content = to_string(workflow, Format::from_path(path))
        .with_context(|| format!("Failed to serialize workflow {}", workflow.id))?;
    fs::write(path, content).with_context(|| format!("Failed to write workflow file to {}", path.display()))?;
    Ok(())
}
