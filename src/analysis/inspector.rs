use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use crate::analysis::sources::SourceFilter;
use crate::error::Result;
use crate::git::HistoryQueries;
use crate::models::{FirstCommitDate, RepositoryMetricsRecord};

/// Runs every metric query against a cloned repository.
#[derive(Clone)]
pub struct RepositoryInspector {
    history: Arc<dyn HistoryQueries>,
    filter: SourceFilter,
}

impl RepositoryInspector {
    pub fn new(history: Arc<dyn HistoryQueries>, filter: SourceFilter) -> Self {
        Self { history, filter }
    }

    /// Each query is independent; a failing one leaves its field empty and
    /// the rest still run.
    pub fn inspect(&self, project_name: &str, repo: &Path) -> RepositoryMetricsRecord {
        tracing::debug!(
            "Inspecting {} with {} history backend",
            project_name,
            self.history.name()
        );

        let record = RepositoryMetricsRecord {
            project_name: project_name.to_string(),
            revision_count: settle(project_name, "revision count", self.history.revision_count(repo)),
            author_count: settle(project_name, "author count", self.history.author_count(repo)),
            source_file_count: settle(project_name, "source file count", self.filter.count_files(repo)),
            source_line_count: settle(project_name, "source LOC", self.filter.count_lines(repo)),
            first_commit_date: settle(
                project_name,
                "first commit date",
                self.history.first_commit_date(repo),
            )
            .map(FirstCommitDate::On),
        };

        if record.missing_fields() > 0 {
            tracing::warn!(
                "{} of 5 metrics unavailable for {}",
                record.missing_fields(),
                project_name
            );
        }

        record
    }
}

fn settle<T: Display>(project_name: &str, query: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => {
            tracing::debug!("{} {}: {}", project_name, query, value);
            Some(value)
        }
        Err(e) if e.is_query_failure() => {
            tracing::warn!("Failed to query {} for {}: {}", query, project_name, e);
            None
        }
        Err(e) => {
            tracing::error!("Could not run {} query for {}: {}", query, project_name, e);
            None
        }
    }
}
