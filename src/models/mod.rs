pub mod plan;
pub mod run_state;
pub mod target;
pub mod window;

pub use plan::{plan_run, RunPlan};
pub use run_state::RunState;
pub use target::DispatchTarget;
pub use window::ProcessingWindow;
