use tracing::{debug, warn};

use crate::graph::outcome::{Ignored, Outcome};
use crate::graph::store::{GraphStore, StepDataPatch};
use crate::workflow::{Delay, DelayUnit, StepType};

/// The step-configuration form as the user fills it in.
///
/// `step_type` is kept as raw text: it is only trusted once it has been
/// checked against the closed set of step types. A `None` description keeps
/// the stored one; a blank description clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEdit {
    pub label: String,
    pub step_type: String,
    pub delay_value: u32,
    pub delay_unit: DelayUnit,
    pub description: Option<String>,
}

impl NodeEdit {
    pub fn new(label: impl Into<String>, step_type: impl Into<String>, delay_value: u32, delay_unit: DelayUnit) -> Self {
        Self {
            label: label.into(),
            step_type: step_type.into(),
            delay_value,
            delay_unit,
            description: None,
        }
    }

    pub fn delay(&self) -> Delay {
        Delay::new(self.delay_value, self.delay_unit)
    }
}

/// Validates step edits before they reach the [`GraphStore`].
///
/// An edit is all-or-nothing: a blank label or an unknown step type rejects
/// the whole edit and leaves the node untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeConfigController;

impl NodeConfigController {
    pub fn new() -> Self {
        Self
    }

    /// Current values of a node, shaped for the edit form.
    pub fn form_for(&self, store: &GraphStore, id: &str) -> Option<NodeEdit> {
        let data = &store.node(id)?.data;
        let delay = data.parsed_delay().unwrap_or_else(|e| {
            warn!(node_id = %id, error = %e, "Unreadable delay, editing from zero");
            Delay::IMMEDIATE
        });
        Some(NodeEdit {
            label: data.label.clone(),
            step_type: data.step_type.to_string(),
            delay_value: delay.value,
            delay_unit: delay.unit,
            description: data.description.clone(),
        })
    }

    pub fn commit(&self, store: &mut GraphStore, id: &str, edit: NodeEdit) -> Outcome {
        if !store.contains(id) {
            return Outcome::Ignored(Ignored::NodeNotFound(id.to_string()));
        }

        let label = edit.label.trim();
        if label.is_empty() {
            return Outcome::Ignored(Ignored::EmptyLabel);
        }

        let Ok(step_type) = edit.step_type.parse::<StepType>() else {
            debug!(node_id = %id, step_type = %edit.step_type, "Edit rejected, unknown step type");
            return Outcome::Ignored(Ignored::InvalidStepType(edit.step_type));
        };

        let patch = StepDataPatch {
            label: Some(label.to_string()),
            step_type: Some(step_type),
            delay: Some(edit.delay().render()),
            description: edit.description.map(|d| {
                let d = d.trim();
                (!d.is_empty()).then(|| d.to_string())
            }),
        };
        store.update_node_data(id, patch)
    }
}
