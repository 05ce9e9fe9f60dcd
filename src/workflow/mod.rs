pub mod builder;
pub mod delay;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

pub use delay::{Delay, DelayUnit, START_IMMEDIATELY};

/// A named outreach sequence, in its persisted (callback-free) form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<StepNode>,
    #[serde(default)]
    pub edges: Vec<StepEdge>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workflow {
    pub const DEFAULT_TITLE: &'static str = "Untitled Workflow";

    /// Empty workflow stamped with the current time.
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn node(&self, id: &str) -> Option<&StepNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Checks the persisted invariants: unique node ids, edges that only
    /// reference present nodes, and delay descriptors that parse.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(WorkflowError::DuplicateNodeId(node.id.clone()));
            }
            node.data.parsed_delay()?;
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(WorkflowError::DanglingEdge {
                        edge_id: edge.id.clone(),
                        missing_node_id: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The closed set of actions a step can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepType {
    Call,
    #[serde(rename = "SMS")]
    Sms,
    Email,
    Wait,
    Condition,
}

impl StepType {
    pub const ALL: [StepType; 5] = [
        StepType::Call,
        StepType::Sms,
        StepType::Email,
        StepType::Wait,
        StepType::Condition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Call => "Call",
            StepType::Sms => "SMS",
            StepType::Email => "Email",
            StepType::Wait => "Wait",
            StepType::Condition => "Condition",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepType {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| WorkflowError::InvalidStepType(s.to_string()))
    }
}

/// Opaque view-layer coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Renderer tag on every persisted node. Only one kind exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NodeKind {
    #[default]
    #[serde(rename = "customStep")]
    CustomStep,
}

/// Semantic payload of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepData {
    pub label: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub delay: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StepData {
    pub fn new(label: impl Into<String>, step_type: StepType, delay: Delay) -> Self {
        Self {
            label: label.into(),
            step_type,
            delay: delay.render(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn parsed_delay(&self) -> Result<Delay, WorkflowError> {
        Delay::parse(&self.delay)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepNode {
    pub id: String,
    pub position: Position,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    pub data: StepData,
}

impl StepNode {
    pub fn new(id: impl Into<String>, position: Position, data: StepData) -> Self {
        Self {
            id: id.into(),
            position,
            kind: NodeKind::CustomStep,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub stroke: String,
}

/// Directed "proceed to target after source" relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
}

impl StepEdge {
    /// Plain edge without presentation attributes.
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            animated: None,
            style: None,
        }
    }

    /// Conventional id for an edge between two steps: `e<source>-<target>`.
    pub fn id_for(source: &str, target: &str) -> String {
        format!("e{}-{}", source, target)
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
