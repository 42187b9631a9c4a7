mod engine;
mod plan;

pub use engine::{FiredMarkers, MonitorEngine, MonitorState};
pub use plan::{compute_plan, Plan, PlanInput};
