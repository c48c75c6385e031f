pub mod inspector;
pub mod pipeline;
pub mod sources;

pub use inspector::RepositoryInspector;
pub use pipeline::{IssueCountPipeline, ProjectOutcome, RepositoryMetricsPipeline, RunSummary};
pub use sources::SourceFilter;
