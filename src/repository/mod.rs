use std::collections::HashSet;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::WorkflowError;
use crate::graph::{Ignored, Outcome};
use crate::workflow::{StepEdge, StepNode, Workflow};

/// Fields of a workflow that can change without touching its graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// In-memory collection of workflows plus the current selection.
///
/// Records held here are always in dehydrated form. Nothing is written to
/// disk; see [`crate::persist`] for export.
#[derive(Debug, Default)]
pub struct WorkflowRepository {
    workflows: Vec<Workflow>,
    active: Option<String>,
}

impl WorkflowRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// New empty workflow with a generated id. It becomes the active one.
    pub fn create(&mut self) -> Workflow {
        self.create_with(Workflow::DEFAULT_TITLE, "")
    }

    pub fn create_with(&mut self, title: &str, description: &str) -> Workflow {
        let workflow = Workflow::new(Uuid::new_v4().to_string(), title, description);
        info!(workflow_id = %workflow.id, title = %workflow.title, "Workflow created");
        self.workflows.push(workflow.clone());
        self.active = Some(workflow.id.clone());
        workflow
    }

    /// Adds an existing record (e.g. one loaded from a file) after checking
    /// its invariants. The selection is unchanged.
    pub fn import(&mut self, workflow: Workflow) -> Result<(), WorkflowError> {
        workflow.validate()?;
        info!(workflow_id = %workflow.id, nodes = workflow.nodes.len(), "Workflow imported");
        match self.position(&workflow.id) {
            Some(i) => self.workflows[i] = workflow,
            None => self.workflows.push(workflow),
        }
        Ok(())
    }

    pub fn list(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn get(&self, id: &str) -> Option<&Workflow> {
        self.workflows.iter().find(|w| w.id == id)
    }

    pub fn active(&self) -> Option<&Workflow> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Changes the selection. An unknown id leaves no workflow active.
    pub fn select(&mut self, id: &str) -> Outcome {
        if self.get(id).is_some() {
            info!(workflow_id = %id, "Workflow selected");
            self.active = Some(id.to_string());
            Outcome::done()
        } else {
            warn!(workflow_id = %id, "Selected unknown workflow, nothing is active");
            self.active = None;
            Outcome::Ignored(Ignored::WorkflowNotFound(id.to_string()))
        }
    }

    pub fn update_metadata(&mut self, id: &str, patch: MetadataPatch) -> Outcome {
        let Some(workflow) = self.get_mut(id) else {
            return Outcome::Ignored(Ignored::WorkflowNotFound(id.to_string()));
        };
        if let Some(title) = patch.title {
            workflow.title = title;
        }
        if let Some(description) = patch.description {
            workflow.description = description;
        }
        Outcome::done()
    }

    /// Dehydrates the given graph into the stored record and bumps
    /// `updated_at`. Edges whose endpoints are missing from `nodes` are
    /// dropped rather than persisted. A graph with repeated node ids is
    /// refused and the stored record is left as it was.
    pub fn save(&mut self, id: &str, nodes: &[StepNode], edges: &[StepEdge]) -> Outcome {
        let Some(workflow) = self.get_mut(id) else {
            warn!(workflow_id = %id, "Save ignored, workflow not found");
            return Outcome::Ignored(Ignored::WorkflowNotFound(id.to_string()));
        };

        let mut present: HashSet<&str> = HashSet::with_capacity(nodes.len());
        for node in nodes {
            if !present.insert(node.id.as_str()) {
                warn!(workflow_id = %id, node_id = %node.id, "Save ignored, duplicate node id");
                return Outcome::Ignored(Ignored::DuplicateNodeId(node.id.clone()));
            }
        }
        let mut kept = Vec::with_capacity(edges.len());
        for edge in edges {
            if present.contains(edge.source.as_str()) && present.contains(edge.target.as_str()) {
                kept.push(edge.clone());
            } else {
                warn!(workflow_id = %id, edge_id = %edge.id, "Dropping dangling edge on save");
            }
        }

        workflow.nodes = nodes.to_vec();
        workflow.edges = kept;
        workflow.updated_at = Utc::now();
        info!(workflow_id = %id, nodes = workflow.nodes.len(), edges = workflow.edges.len(), "Workflow saved");
        Outcome::done()
    }

    /// Deletes a workflow; deleting the active one clears the selection.
    pub fn remove(&mut self, id: &str) -> Outcome<Workflow> {
        let Some(i) = self.position(id) else {
            return Outcome::Ignored(Ignored::WorkflowNotFound(id.to_string()));
        };
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        Outcome::Applied(self.workflows.remove(i))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.workflows.iter().position(|w| w.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Workflow> {
        self.workflows.iter_mut().find(|w| w.id == id)
    }
}
