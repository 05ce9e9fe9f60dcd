use std::fmt;
use std::sync::Arc;

use crate::workflow::StepNode;

pub type NodeCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Transient UI wiring for one node (edit / delete buttons on the card).
///
/// Handlers live beside the graph, keyed by node id, and are never part of
/// the persisted record. They are rebuilt through a [`HandlerFactory`] each
/// time a workflow is loaded into the editor.
#[derive(Clone, Default)]
pub struct NodeHandlers {
    pub on_edit: Option<NodeCallback>,
    pub on_delete: Option<NodeCallback>,
}

impl NodeHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_edit(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_edit = Some(Arc::new(f));
        self
    }

    pub fn on_delete(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_delete = Some(Arc::new(f));
        self
    }

    /// Returns false when no edit handler is bound.
    pub fn edit(&self, node_id: &str) -> bool {
        match &self.on_edit {
            Some(f) => {
                f(node_id);
                true
            }
            None => false,
        }
    }

    pub fn delete(&self, node_id: &str) -> bool {
        match &self.on_delete {
            Some(f) => {
                f(node_id);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for NodeHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeHandlers")
            .field("on_edit", &self.on_edit.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .finish()
    }
}

/// Produces handlers for a node during rehydration.
pub trait HandlerFactory {
    fn handlers_for(&self, node: &StepNode) -> NodeHandlers;
}

impl<F> HandlerFactory for F
where
    F: Fn(&StepNode) -> NodeHandlers,
{
    fn handlers_for(&self, node: &StepNode) -> NodeHandlers {
        self(node)
    }
}

/// Factory for headless use (CLI, tests): binds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHandlers;

impl HandlerFactory for NoHandlers {
    fn handlers_for(&self, _node: &StepNode) -> NodeHandlers {
        NodeHandlers::default()
    }
}
