pub mod cli;
pub mod config;
pub mod generator;
pub mod i18n;
pub mod llm;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use generator::context::SessionContext;
pub use generator::workflow::{PipelineError, PipelineOutcome, launch, run_submission};
pub use types::submission::Submission;
