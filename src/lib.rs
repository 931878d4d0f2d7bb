pub mod archive;
pub mod cli;
pub mod dispatch;
pub mod driver;
pub mod environment;
pub mod error;
pub mod models;
pub mod rotation;
pub mod settings;
pub mod state;
pub mod submit;
pub mod utils;

pub use driver::{DailyDriver, RunReport};
pub use error::{DriverError, Result};
