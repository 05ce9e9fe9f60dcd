use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::EdgeConfig;
use crate::graph::handlers::{HandlerFactory, NodeHandlers};
use crate::graph::outcome::{Ignored, Outcome};
use crate::workflow::{Position, StepData, StepEdge, StepNode, StepType};

/// Shallow patch over [`StepData`]: `Some` fields overwrite, `None` fields
/// are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepDataPatch {
    pub label: Option<String>,
    pub step_type: Option<StepType>,
    pub delay: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
}

impl StepDataPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    fn apply(self, data: &mut StepData) {
        if let Some(label) = self.label {
            data.label = label;
        }
        if let Some(step_type) = self.step_type {
            data.step_type = step_type;
        }
        if let Some(delay) = self.delay {
            data.delay = delay;
        }
        if let Some(description) = self.description {
            data.description = description;
        }
    }
}

/// Live node and edge collections for the workflow being edited.
///
/// Nodes keep insertion order; `index` maps ids to slots in `nodes`. UI
/// handlers are held in a side table keyed by node id so the node values
/// themselves stay plain data.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<StepNode>,
    index: HashMap<String, usize>,
    edges: Vec<StepEdge>,
    handlers: HashMap<String, NodeHandlers>,
    edge_config: EdgeConfig,
    dirty: bool,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge_config(edge_config: EdgeConfig) -> Self {
        Self {
            edge_config,
            ..Self::default()
        }
    }

    /// Loads persisted nodes and edges and binds fresh handlers to every node.
    /// The resulting store starts clean.
    pub fn hydrate(
        nodes: Vec<StepNode>,
        edges: Vec<StepEdge>,
        factory: &dyn HandlerFactory,
        edge_config: EdgeConfig,
    ) -> Self {
        let mut store = Self::with_edge_config(edge_config);
        for node in nodes {
            let handlers = factory.handlers_for(&node);
            let id = node.id.clone();
            if store.insert(node).is_applied() {
                store.handlers.insert(id, handlers);
            }
        }
        store.edges = edges;
        store.dirty = false;
        store
    }

    /// Plain copies of the current graph, with no handler references.
    pub fn snapshot(&self) -> (Vec<StepNode>, Vec<StepEdge>) {
        (self.nodes.clone(), self.edges.clone())
    }

    pub fn nodes(&self) -> &[StepNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[StepEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&StepNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn last_node(&self) -> Option<&StepNode> {
        self.nodes.last()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn handlers(&self, id: &str) -> Option<&NodeHandlers> {
        self.handlers.get(id)
    }

    /// Replaces the handlers bound to a node.
    pub fn bind(&mut self, id: &str, handlers: NodeHandlers) -> Outcome {
        if !self.contains(id) {
            return Outcome::Ignored(Ignored::NodeNotFound(id.to_string()));
        }
        self.handlers.insert(id.to_string(), handlers);
        Outcome::done()
    }

    pub fn add_node(&mut self, node: StepNode) -> Outcome {
        let outcome = self.insert(node);
        if outcome.is_applied() {
            self.dirty = true;
        }
        outcome
    }

    fn insert(&mut self, node: StepNode) -> Outcome {
        if self.index.contains_key(&node.id) {
            warn!(node_id = %node.id, "Duplicate node id, node not added");
            return Outcome::Ignored(Ignored::DuplicateNodeId(node.id));
        }
        debug!(node_id = %node.id, step_type = %node.data.step_type, "Node added");
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Outcome::done()
    }

    /// Removes a node and every edge touching it. Removing an absent id is a
    /// no-op, so repeated deletes are harmless.
    pub fn remove_node(&mut self, id: &str) -> Outcome {
        let Some(slot) = self.index.remove(id) else {
            debug!(node_id = %id, "Remove ignored, node not present");
            return Outcome::Ignored(Ignored::NodeNotFound(id.to_string()));
        };

        self.nodes.remove(slot);
        for i in self.index.values_mut() {
            if *i > slot {
                *i -= 1;
            }
        }

        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        self.handlers.remove(id);
        self.dirty = true;
        debug!(node_id = %id, edges_removed = before - self.edges.len(), "Node removed");
        Outcome::done()
    }

    /// Trusted primitive: appends without checking endpoints, duplicates or
    /// self-loops. Parallel edges are how a Condition step branches.
    pub fn add_edge(&mut self, edge: StepEdge) {
        debug!(edge_id = %edge.id, source = %edge.source, target = %edge.target, "Edge added");
        self.edges.push(edge);
        self.dirty = true;
    }

    /// Removes edges by id (all of them, if the id was reused).
    pub fn remove_edge(&mut self, edge_id: &str) -> Outcome {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != edge_id);
        if self.edges.len() == before {
            return Outcome::Ignored(Ignored::EdgeNotFound(edge_id.to_string()));
        }
        self.dirty = true;
        Outcome::done()
    }

    /// Validated wrapper over [`GraphStore::add_edge`]: refuses self-loops and
    /// unknown endpoints, and stamps the configured presentation attributes.
    /// Does not deduplicate.
    pub fn connect(&mut self, source: &str, target: &str) -> Outcome<StepEdge> {
        if source == target {
            return Outcome::Ignored(Ignored::SelfLoop(source.to_string()));
        }
        for endpoint in [source, target] {
            if !self.contains(endpoint) {
                warn!(node_id = %endpoint, "Connect ignored, node not present");
                return Outcome::Ignored(Ignored::NodeNotFound(endpoint.to_string()));
            }
        }

        let edge = StepEdge {
            id: StepEdge::id_for(source, target),
            source: source.to_string(),
            target: target.to_string(),
            animated: Some(self.edge_config.animated),
            style: Some(self.edge_config.style()),
        };
        self.add_edge(edge.clone());
        Outcome::Applied(edge)
    }

    pub fn update_node_data(&mut self, id: &str, patch: StepDataPatch) -> Outcome {
        let Some(&slot) = self.index.get(id) else {
            warn!(node_id = %id, "Update ignored, node not present");
            return Outcome::Ignored(Ignored::NodeNotFound(id.to_string()));
        };
        patch.apply(&mut self.nodes[slot].data);
        self.dirty = true;
        debug!(node_id = %id, "Node data updated");
        Outcome::done()
    }

    /// Position updates coming from the view's drag layer.
    pub fn move_node(&mut self, id: &str, position: Position) -> Outcome {
        let Some(&slot) = self.index.get(id) else {
            return Outcome::Ignored(Ignored::NodeNotFound(id.to_string()));
        };
        self.nodes[slot].position = position;
        self.dirty = true;
        Outcome::done()
    }
}
