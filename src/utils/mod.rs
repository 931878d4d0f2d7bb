pub mod constants;
pub mod elapsed;
pub mod progress;

pub use constants::*;
pub use elapsed::format_elapsed;
pub use progress::ProgressReporter;
