use thiserror::Error;

/// Result of a structural edit that is allowed to be a silent no-op.
///
/// `Ignored` is not a failure: the graph is left exactly as it was and the
/// reason is returned so callers can assert on it instead of diffing state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T = ()> {
    Applied(T),
    Ignored(Ignored),
}

/// Why an edit was not applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Ignored {
    #[error("node '{0}' not found")]
    NodeNotFound(String),

    #[error("edge '{0}' not found")]
    EdgeNotFound(String),

    #[error("workflow '{0}' not found")]
    WorkflowNotFound(String),

    #[error("no workflow is active")]
    NoActiveWorkflow,

    #[error("node id '{0}' is already in use")]
    DuplicateNodeId(String),

    #[error("refusing to connect node '{0}' to itself")]
    SelfLoop(String),

    #[error("'{0}' is not a step type")]
    InvalidStepType(String),

    #[error("step label must not be empty")]
    EmptyLabel,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn ignored(&self) -> Option<&Ignored> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Ignored(reason) => Some(reason),
        }
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Ignored(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Applied(value) => Outcome::Applied(f(value)),
            Outcome::Ignored(reason) => Outcome::Ignored(reason),
        }
    }
}

impl Outcome {
    pub fn done() -> Self {
        Outcome::Applied(())
    }
}
