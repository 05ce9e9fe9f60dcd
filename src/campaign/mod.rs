use chrono::{DateTime, Duration, Utc};

use crate::error::WorkflowError;
use crate::workflow::{StepNode, StepType, Workflow};

/// One step of a campaign with its timing resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledStep {
    pub node_id: String,
    pub label: String,
    pub step_type: StepType,
    /// Wait after the previous step.
    pub delay: Duration,
    /// Wait from campaign start.
    pub offset: Duration,
}

/// Step timing derived from a stored workflow, in stored node order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CampaignPlan {
    pub steps: Vec<ScheduledStep>,
}

impl CampaignPlan {
    pub fn from_workflow(workflow: &Workflow) -> Result<Self, WorkflowError> {
        Self::from_nodes(&workflow.nodes)
    }

    pub fn from_nodes(nodes: &[StepNode]) -> Result<Self, WorkflowError> {
        let mut offset = Duration::zero();
        let mut steps = Vec::with_capacity(nodes.len());
        for node in nodes {
            let delay = node.data.parsed_delay()?.to_duration();
            offset = offset
                .checked_add(&delay)
                .ok_or_else(|| WorkflowError::ScheduleOverflow(node.id.clone()))?;
            steps.push(ScheduledStep {
                node_id: node.id.clone(),
                label: node.data.label.clone(),
                step_type: node.data.step_type,
                delay,
                offset,
            });
        }
        Ok(Self { steps })
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.last().map(|s| s.offset).unwrap_or_else(Duration::zero)
    }

    /// Absolute fire times for a campaign launched at `start`. Fails on the
    /// first step whose fire time is past the representable calendar.
    pub fn fire_times(&self, start: DateTime<Utc>) -> Result<Vec<(String, DateTime<Utc>)>, WorkflowError> {
        self.steps
            .iter()
            .map(|s| {
                start
                    .checked_add_signed(s.offset)
                    .map(|at| (s.node_id.clone(), at))
                    .ok_or_else(|| WorkflowError::ScheduleOverflow(s.node_id.clone()))
            })
            .collect()
    }

    /// One display line per step, e.g. `2. SMS - Follow up (+45m)`.
    pub fn preview(&self) -> Vec<String> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {} - {} (+{})", i + 1, s.step_type, s.label, format_offset(s.offset)))
            .collect()
    }
}

fn format_offset(offset: Duration) -> String {
    let hours = offset.num_hours();
    let mins = offset.num_minutes() % 60;
    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h{}m", h, m),
    }
}
