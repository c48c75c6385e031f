use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use apache_metrics::analysis::RunSummary;
use apache_metrics::config::{HistoryBackend, IssueSource};
use apache_metrics::git::{GitCliHistory, HistoryQueries, LibGitHistory};
use apache_metrics::models::ProjectDescriptor;
use apache_metrics::{
    catalog, BrowserIssueCounter, Config, GitCloner, IssueCountPipeline, JiraRestClient,
    PipelineConfig, RepositoryInspector, RepositoryMetricsPipeline, SourceFilter, TrackerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "apache-metrics")]
#[command(version = "0.1.0")]
#[command(about = "Collect repository and JIRA issue metrics for Apache projects")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default)]
enum Command {
    /// Clone each project and record revisions, authors, source size and first commit
    Repos,
    /// Record each project's JIRA issue count
    Issues,
    /// Run both collections
    #[default]
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("apache_metrics=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let projects = catalog::projects(&config.repo_base_url);
    let command = args.command.unwrap_or_default();

    if matches!(command, Command::Repos | Command::All) {
        collect_repository_metrics(&config, &projects).await?;
    }

    if matches!(command, Command::Issues | Command::All) {
        collect_issue_counts(&config, &projects).await?;
    }

    Ok(())
}

async fn collect_repository_metrics(
    config: &Config,
    projects: &[ProjectDescriptor],
) -> anyhow::Result<RunSummary> {
    tracing::info!("Beginning collecting Git data for Apache Java projects");

    let history: Arc<dyn HistoryQueries> = match config.history_backend {
        HistoryBackend::LibGit => Arc::new(LibGitHistory::new()),
        HistoryBackend::Cli => Arc::new(GitCliHistory::new()),
    };
    let filter = SourceFilter::new(&config.source_extensions)
        .skip_hidden_for_loc(config.loc_skip_hidden);

    let pipeline = RepositoryMetricsPipeline::new(
        GitCloner::new(),
        RepositoryInspector::new(history, filter),
        PipelineConfig::from(config),
    );

    Ok(pipeline.run(projects).await?)
}

async fn collect_issue_counts(
    config: &Config,
    projects: &[ProjectDescriptor],
) -> anyhow::Result<RunSummary> {
    tracing::info!("Beginning collecting JIRA issue counts");

    let pipeline_config = PipelineConfig::from(config);
    let pipeline = match config.issue_source {
        IssueSource::Browser => IssueCountPipeline::new(
            BrowserIssueCounter::new(&TrackerConfig::from(config)).await?,
            pipeline_config,
        ),
        IssueSource::Rest => IssueCountPipeline::new(
            JiraRestClient::new(&config.jira_base_url)?,
            pipeline_config,
        ),
    };

    Ok(pipeline.run(projects).await?)
}
