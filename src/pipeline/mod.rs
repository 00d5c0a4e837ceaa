pub mod controller;
pub mod state;
pub mod summary;
pub mod worker;

pub use controller::PipelineController;
pub use state::{ActiveRun, SessionState};
pub use summary::{AnalysisReport, SessionSummary, SourceFailure, TargetRange};
pub use worker::{analyze_source, SourceOutcome};
