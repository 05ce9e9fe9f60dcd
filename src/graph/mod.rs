pub mod config;
pub mod handlers;
pub mod layout;
pub mod outcome;
pub mod store;

pub use config::{NodeConfigController, NodeEdit};
pub use handlers::{HandlerFactory, NoHandlers, NodeCallback, NodeHandlers};
pub use layout::{LayoutPlacer, Placement};
pub use outcome::{Ignored, Outcome};
pub use store::{GraphStore, StepDataPatch};
