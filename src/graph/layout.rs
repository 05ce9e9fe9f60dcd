use tracing::debug;

use crate::config::LayoutConfig;
use crate::graph::outcome::Outcome;
use crate::graph::store::GraphStore;
use crate::workflow::{Position, StepData, StepEdge, StepNode};

/// Where an appended step goes and which node it should be wired from.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub position: Position,
    pub predecessor: Option<String>,
}

/// Places steps created by "Add Step".
///
/// The new step always hangs off the most recently inserted node, not the
/// graph's actual sink. Chains built by repeated "Add Step" are linear;
/// branching is done by hand in the view.
#[derive(Debug, Clone)]
pub struct LayoutPlacer {
    origin: Position,
    vertical_spacing: f64,
}

impl Default for LayoutPlacer {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl LayoutPlacer {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            origin: config.origin,
            vertical_spacing: config.vertical_spacing,
        }
    }

    pub fn place(&self, nodes: &[StepNode]) -> Placement {
        match nodes.last() {
            None => Placement {
                position: self.origin,
                predecessor: None,
            },
            Some(last) => Placement {
                position: Position::new(last.position.x, last.position.y + self.vertical_spacing),
                predecessor: Some(last.id.clone()),
            },
        }
    }

    /// Adds a step below the current tail and connects the tail to it.
    ///
    /// Returns the auto-wired edge, or `None` when the graph was empty.
    pub fn append_step(
        &self,
        store: &mut GraphStore,
        id: impl Into<String>,
        data: StepData,
    ) -> Outcome<Option<StepEdge>> {
        let id = id.into();
        let placement = self.place(store.nodes());

        if let Outcome::Ignored(reason) = store.add_node(StepNode::new(id.clone(), placement.position, data)) {
            return Outcome::Ignored(reason);
        }
        debug!(node_id = %id, x = placement.position.x, y = placement.position.y, "Step appended");

        match placement.predecessor {
            Some(previous) => store.connect(&previous, &id).map(Some),
            None => Outcome::Applied(None),
        }
    }
}
