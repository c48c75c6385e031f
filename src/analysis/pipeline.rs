use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::analysis::inspector::RepositoryInspector;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::git::{CloneOutcome, RepositoryCloner, WorkingCopy};
use crate::models::{IssueCountRecord, ProjectDescriptor, RepositoryMetricsRecord};
use crate::storage::{ResultWriter, TableKind};
use crate::tracker::IssueCounter;

/// Where a project is in the clone → inspect → record → clean up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pending,
    Cloned,
    Inspected,
    Recorded,
    CleanedUp,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pending => "pending",
            Stage::Cloned => "cloned",
            Stage::Inspected => "inspected",
            Stage::Recorded => "recorded",
            Stage::CleanedUp => "cleaned up",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn enter(project: &ProjectDescriptor, stage: Stage) {
    tracing::debug!("{}: {}", project.name, stage);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOutcome {
    Recorded(RepositoryMetricsRecord),
    NotFound(RepositoryMetricsRecord),
    Skipped(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub recorded: usize,
    pub not_found: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn tally(&mut self, outcome: &ProjectOutcome) {
        match outcome {
            ProjectOutcome::Recorded(_) => self.recorded += 1,
            ProjectOutcome::NotFound(_) => self.not_found += 1,
            ProjectOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} projects {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// Clones, measures and removes one project at a time, appending a row to the
/// repository metrics table for each.
pub struct RepositoryMetricsPipeline {
    cloner: Arc<dyn RepositoryCloner>,
    inspector: RepositoryInspector,
    writer: ResultWriter,
    config: PipelineConfig,
}

impl RepositoryMetricsPipeline {
    pub fn new(
        cloner: impl RepositoryCloner + 'static,
        inspector: RepositoryInspector,
        config: PipelineConfig,
    ) -> Self {
        Self {
            cloner: Arc::new(cloner),
            inspector,
            writer: ResultWriter::new(&config.output_dir),
            config,
        }
    }

    pub fn writer(&self) -> &ResultWriter {
        &self.writer
    }

    pub async fn run(&self, projects: &[ProjectDescriptor]) -> Result<RunSummary> {
        self.writer.create_table(TableKind::RepositoryMetrics)?;
        tracing::info!(
            "Collecting repository metrics for {} projects into {}",
            projects.len(),
            self.writer.table_path(TableKind::RepositoryMetrics).display()
        );

        let pb = progress_bar(projects.len());
        let mut summary = RunSummary::default();

        for project in projects {
            pb.set_message(project.name.clone());
            let outcome = self.process_project(project).await?;
            summary.tally(&outcome);
            pb.inc(1);
        }

        pb.finish_with_message("done");
        tracing::info!(
            "Repository metrics: {} recorded, {} not found, {} skipped",
            summary.recorded,
            summary.not_found,
            summary.skipped
        );
        Ok(summary)
    }

    /// Only a failure to write the output table is returned as an error.
    pub async fn process_project(&self, project: &ProjectDescriptor) -> Result<ProjectOutcome> {
        enter(project, Stage::Pending);
        let working_copy = match WorkingCopy::acquire(&self.config.work_dir, &project.name) {
            Ok(copy) => copy,
            Err(e) => {
                enter(project, Stage::Failed);
                tracing::error!("No working directory for {}: {}", project.name, e);
                return Ok(ProjectOutcome::Skipped(e.to_string()));
            }
        };

        tracing::info!("Cloning the project {}...", project.name);
        let clone = match self
            .cloner
            .clone_repository(project, working_copy.path())
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => CloneOutcome::OtherFailure {
                code: None,
                stderr: e.to_string(),
            },
        };

        let outcome = self.record(project, clone, working_copy.path()).await;

        let path = working_copy.path().display().to_string();
        match working_copy.release() {
            Ok(()) => {
                enter(project, Stage::CleanedUp);
                tracing::info!("Finished {}; removed {}", project.name, path);
            }
            Err(e) => tracing::warn!("Failed to remove {}: {}", path, e),
        }

        outcome
    }

    async fn record(
        &self,
        project: &ProjectDescriptor,
        clone: CloneOutcome,
        repo: &Path,
    ) -> Result<ProjectOutcome> {
        match clone {
            CloneOutcome::Success => {
                enter(project, Stage::Cloned);
                let inspector = self.inspector.clone();
                let name = project.name.clone();
                let repo = repo.to_path_buf();
                let record =
                    tokio::task::spawn_blocking(move || inspector.inspect(&name, &repo)).await?;
                enter(project, Stage::Inspected);

                self.writer.append_row(&record)?;
                enter(project, Stage::Recorded);
                Ok(ProjectOutcome::Recorded(record))
            }
            CloneOutcome::NotFound => {
                tracing::warn!("Repository for project {} was not found", project.name);
                let record = RepositoryMetricsRecord::not_found(&project.name);
                self.writer.append_row(&record)?;
                enter(project, Stage::Recorded);
                Ok(ProjectOutcome::NotFound(record))
            }
            CloneOutcome::OtherFailure { code, stderr } => {
                enter(project, Stage::Failed);
                let reason = match code {
                    Some(code) => format!("git clone exited with {}: {}", code, stderr),
                    None => format!("git clone failed: {}", stderr),
                };
                tracing::error!("Skipping {}: {}", project.name, reason);
                Ok(ProjectOutcome::Skipped(reason))
            }
        }
    }
}

/// Asks the issue tracker for each project's issue total and appends a row
/// to the issue count table.
pub struct IssueCountPipeline {
    counter: Arc<dyn IssueCounter>,
    writer: ResultWriter,
}

impl IssueCountPipeline {
    pub fn new(counter: impl IssueCounter + 'static, config: PipelineConfig) -> Self {
        Self {
            counter: Arc::new(counter),
            writer: ResultWriter::new(&config.output_dir),
        }
    }

    pub fn writer(&self) -> &ResultWriter {
        &self.writer
    }

    pub async fn run(&self, projects: &[ProjectDescriptor]) -> Result<RunSummary> {
        self.writer.create_table(TableKind::IssueCounts)?;
        tracing::info!(
            "Collecting issue counts for {} projects via {}",
            projects.len(),
            self.counter.name()
        );

        let pb = progress_bar(projects.len());
        let mut summary = RunSummary::default();

        for project in projects {
            pb.set_message(project.name.clone());
            match self.counter.fetch_issue_count(&project.name).await {
                Ok(issue_count) => {
                    tracing::info!("{} has {} issues", project.name, issue_count);
                    self.writer.append_row(&IssueCountRecord {
                        project_name: project.name.clone(),
                        issue_count,
                    })?;
                    summary.recorded += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to fetch issue count for {}: {}", project.name, e);
                    summary.skipped += 1;
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message("done");
        tracing::info!(
            "Issue counts: {} recorded, {} skipped",
            summary.recorded,
            summary.skipped
        );
        Ok(summary)
    }
}
