use crate::graph::LayoutPlacer;
use crate::workflow::{Delay, Position, StepData, StepEdge, StepNode, StepType, Workflow};

/// Fluent construction of workflow records, mostly for fixtures and tooling.
///
/// Steps added without an explicit position are stacked below the previous
/// step using the default layout, the same way the editor's "Add Step"
/// action places them.
pub struct WorkflowBuilder {
    workflow: Workflow,
    placer: LayoutPlacer,
}

impl WorkflowBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            workflow: Workflow::new(id, Workflow::DEFAULT_TITLE, ""),
            placer: LayoutPlacer::default(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.workflow.title = title.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.workflow.description = description.to_string();
        self
    }

    pub fn step(self, id: &str, step_type: StepType, label: &str) -> StepBuilder {
        let position = self.placer.place(&self.workflow.nodes).position;
        StepBuilder {
            workflow_builder: self,
            node: StepNode::new(id, position, StepData::new(label, step_type, Delay::IMMEDIATE)),
        }
    }

    pub fn connect(mut self, source: &str, target: &str) -> Self {
        self.workflow
            .edges
            .push(StepEdge::new(StepEdge::id_for(source, target), source, target));
        self
    }

    /// Connects every step to the next one in insertion order.
    pub fn chain(mut self) -> Self {
        let pairs: Vec<(String, String)> = self
            .workflow
            .nodes
            .windows(2)
            .map(|w| (w[0].id.clone(), w[1].id.clone()))
            .collect();
        for (source, target) in pairs {
            self = self.connect(&source, &target);
        }
        self
    }

    pub fn build(self) -> Workflow {
        self.workflow
    }
}

pub struct StepBuilder {
    workflow_builder: WorkflowBuilder,
    node: StepNode,
}

impl StepBuilder {
    pub fn delay(mut self, delay: Delay) -> Self {
        self.node.data.delay = delay.render();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.node.data.description = Some(description.to_string());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.node.position = Position::new(x, y);
        self
    }

    pub fn build(mut self) -> WorkflowBuilder {
        self.workflow_builder.workflow.nodes.push(self.node);
        self.workflow_builder
    }
}
