pub mod config;
mod orchestrator;
mod scheduler;
pub mod stages;
mod store;
mod types;

pub use orchestrator::{render_frame, run_pipeline, run_pipeline_reported};
pub use scheduler::{FilterStats, TcombFilter};
pub use store::{Attribute, AttributeKind, AttributeStore};
pub use types::{PipelineStage, PipelineSummary, ProgressReporter};
