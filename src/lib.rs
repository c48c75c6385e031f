pub mod config;
pub mod error;
pub mod models;
pub mod catalog;
pub mod git;
pub mod analysis;
pub mod storage;
pub mod tracker;

pub use config::{Config, PipelineConfig, TrackerConfig};
pub use error::{Error, Result};
pub use git::{GitCloner, RepositoryCloner};
pub use analysis::{IssueCountPipeline, RepositoryInspector, RepositoryMetricsPipeline, SourceFilter};
pub use storage::ResultWriter;
pub use tracker::{BrowserIssueCounter, IssueCounter, JiraRestClient};
