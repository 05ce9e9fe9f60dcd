use thiserror::Error;

/// Failures raised while parsing or validating workflow records.
///
/// Structural no-ops on the live graph are not errors; those are reported
/// through [`crate::graph::Outcome`].
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Unknown step type '{0}', expected one of Call, SMS, Email, Wait, Condition")]
    InvalidStepType(String),

    #[error("Unknown delay unit '{0}', expected 'mins' or 'hours'")]
    InvalidDelayUnit(String),

    #[error("Malformed delay descriptor '{0}'")]
    InvalidDelay(String),

    #[error("Step '{0}' is scheduled beyond the supported time range")]
    ScheduleOverflow(String),

    #[error("Duplicate node ID: {0}")]
    DuplicateNodeId(String),

    #[error("Edge '{edge_id}' references node '{missing_node_id}', which is not in the workflow")]
    DanglingEdge {
        edge_id: String,
        missing_node_id: String,
    },

    #[error("Failed to (de)serialize workflow JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to (de)serialize workflow YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
