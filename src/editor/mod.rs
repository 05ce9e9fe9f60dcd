use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::graph::{
    GraphStore, HandlerFactory, Ignored, LayoutPlacer, NoHandlers, NodeConfigController, NodeEdit, Outcome,
};
use crate::repository::{MetadataPatch, WorkflowRepository};
use crate::workflow::{Position, StepData, StepEdge, Workflow};

/// What happened to the previous selection when switching workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    pub outcome: Outcome,
    /// Unsaved edits to the previously active workflow were thrown away.
    pub discarded_edits: bool,
}

/// Wires the repository, the live graph and the placement/edit helpers
/// together the way the dashboard drives them.
///
/// Switching away from a workflow without saving drops its edits. Callers
/// that want to warn first can check [`WorkflowEditor::is_dirty`].
pub struct WorkflowEditor {
    repository: WorkflowRepository,
    store: Option<GraphStore>,
    placer: LayoutPlacer,
    controller: NodeConfigController,
    factory: Box<dyn HandlerFactory>,
    config: EditorConfig,
}

impl WorkflowEditor {
    pub fn new(config: EditorConfig, factory: impl HandlerFactory + 'static) -> Self {
        Self {
            repository: WorkflowRepository::new(),
            store: None,
            placer: LayoutPlacer::new(&config.layout),
            controller: NodeConfigController::new(),
            factory: Box::new(factory),
            config,
        }
    }

    /// Editor without any UI handlers, for tooling and tests.
    pub fn headless(config: EditorConfig) -> Self {
        Self::new(config, NoHandlers)
    }

    pub fn repository(&self) -> &WorkflowRepository {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut WorkflowRepository {
        &mut self.repository
    }

    pub fn store(&self) -> Option<&GraphStore> {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> Option<&mut GraphStore> {
        self.store.as_mut()
    }

    pub fn active(&self) -> Option<&Workflow> {
        self.repository.active()
    }

    pub fn is_dirty(&self) -> bool {
        self.store.as_ref().is_some_and(GraphStore::is_dirty)
    }

    pub fn new_workflow(&mut self, title: &str, description: &str) -> Workflow {
        self.warn_if_discarding();
        let workflow = self.repository.create_with(title, description);
        self.load(&workflow);
        workflow
    }

    /// Makes another workflow active and rehydrates it into the live graph.
    /// An unknown id leaves nothing active.
    pub fn switch_to(&mut self, id: &str) -> Switch {
        let discarded_edits = self.warn_if_discarding();
        let outcome = self.repository.select(id);
        match self.repository.active().cloned() {
            Some(workflow) => self.load(&workflow),
            None => self.store = None,
        }
        Switch {
            outcome,
            discarded_edits,
        }
    }

    /// Dehydrates the live graph into the active record.
    pub fn save(&mut self) -> Outcome {
        let (Some(id), Some(store)) = (self.repository.active_id().map(str::to_owned), self.store.as_mut()) else {
            return Outcome::Ignored(Ignored::NoActiveWorkflow);
        };
        let (nodes, edges) = store.snapshot();
        let outcome = self.repository.save(&id, &nodes, &edges);
        if outcome.is_applied() {
            store.mark_clean();
        }
        outcome
    }

    pub fn update_metadata(&mut self, patch: MetadataPatch) -> Outcome {
        match self.repository.active_id().map(str::to_owned) {
            Some(id) => self.repository.update_metadata(&id, patch),
            None => Outcome::Ignored(Ignored::NoActiveWorkflow),
        }
    }

    /// "Add Step": places the step under the last one and wires it up.
    /// A fresh id is generated when none is given.
    pub fn add_step(&mut self, id: Option<String>, data: StepData) -> Outcome<Option<StepEdge>> {
        let Some(store) = self.store.as_mut() else {
            return Outcome::Ignored(Ignored::NoActiveWorkflow);
        };
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let outcome = self.placer.append_step(store, id.clone(), data);
        if outcome.is_applied() {
            if let Some(node) = store.node(&id) {
                let handlers = self.factory.handlers_for(node);
                let _ = store.bind(&id, handlers);
            }
        }
        outcome
    }

    pub fn edit_form(&self, id: &str) -> Option<NodeEdit> {
        self.store.as_ref().and_then(|s| self.controller.form_for(s, id))
    }

    pub fn edit_step(&mut self, id: &str, edit: NodeEdit) -> Outcome {
        match self.store.as_mut() {
            Some(store) => self.controller.commit(store, id, edit),
            None => Outcome::Ignored(Ignored::NoActiveWorkflow),
        }
    }

    pub fn remove_step(&mut self, id: &str) -> Outcome {
        match self.store.as_mut() {
            Some(store) => store.remove_node(id),
            None => Outcome::Ignored(Ignored::NoActiveWorkflow),
        }
    }

    pub fn connect(&mut self, source: &str, target: &str) -> Outcome<StepEdge> {
        match self.store.as_mut() {
            Some(store) => store.connect(source, target),
            None => Outcome::Ignored(Ignored::NoActiveWorkflow),
        }
    }

    pub fn move_step(&mut self, id: &str, position: Position) -> Outcome {
        match self.store.as_mut() {
            Some(store) => store.move_node(id, position),
            None => Outcome::Ignored(Ignored::NoActiveWorkflow),
        }
    }

    fn load(&mut self, workflow: &Workflow) {
        self.store = Some(GraphStore::hydrate(
            workflow.nodes.clone(),
            workflow.edges.clone(),
            self.factory.as_ref(),
            self.config.edges.clone(),
        ));
        info!(workflow_id = %workflow.id, nodes = workflow.nodes.len(), "Workflow loaded into editor");
    }

    fn warn_if_discarding(&self) -> bool {
        let dirty = self.is_dirty();
        if dirty {
            warn!(
                workflow_id = self.repository.active_id().unwrap_or_default(),
                "Discarding unsaved edits"
            );
        }
        dirty
    }
}
