pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use app::{run, run_pipeline};
pub use application::DigestSession;
pub use domain::error::{AppError, Result};
