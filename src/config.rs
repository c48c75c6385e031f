use crate::catalog::DEFAULT_BASE_URL;
use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBackend {
    /// Walk history in-process through libgit2.
    LibGit,
    /// Shell out to the `git` executable.
    Cli,
}

impl FromStr for HistoryBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "libgit" | "libgit2" => Ok(HistoryBackend::LibGit),
            "cli" | "git" => Ok(HistoryBackend::Cli),
            other => Err(Error::Config(format!(
                "HISTORY_BACKEND must be `libgit` or `cli`, got `{}`",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSource {
    Browser,
    Rest,
}

impl FromStr for IssueSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "browser" => Ok(IssueSource::Browser),
            "rest" | "api" => Ok(IssueSource::Rest),
            other => Err(Error::Config(format!(
                "ISSUE_SOURCE must be `browser` or `rest`, got `{}`",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub work_dir: PathBuf,
    pub repo_base_url: String,
    pub source_extensions: Vec<String>,
    pub loc_skip_hidden: bool,
    pub history_backend: HistoryBackend,
    pub issue_source: IssueSource,
    pub jira_base_url: String,
    pub webdriver_url: String,
    pub chromedriver_path: Option<PathBuf>,
    pub headless: bool,
    pub page_wait_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let output_dir = lookup("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("csv"));

        let work_dir = lookup("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("repositories"));

        let repo_base_url = lookup("REPO_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let source_extensions: Vec<String> = lookup("SOURCE_EXTENSIONS")
            .unwrap_or_else(|| "java".to_string())
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        if source_extensions.is_empty() {
            return Err(Error::Config(
                "SOURCE_EXTENSIONS must name at least one extension".to_string(),
            ));
        }

        let loc_skip_hidden = parse_flag(&lookup, "LOC_SKIP_HIDDEN", false)?;

        let history_backend = lookup("HISTORY_BACKEND")
            .map(|v| v.parse::<HistoryBackend>())
            .transpose()?
            .unwrap_or(HistoryBackend::LibGit);

        let issue_source = lookup("ISSUE_SOURCE")
            .map(|v| v.parse::<IssueSource>())
            .transpose()?
            .unwrap_or(IssueSource::Browser);

        let jira_base_url = lookup("JIRA_BASE_URL")
            .unwrap_or_else(|| "https://issues.apache.org/jira".to_string());

        let webdriver_url = lookup("WEBDRIVER_URL")
            .unwrap_or_else(|| "http://localhost:9515".to_string());

        let chromedriver_path = lookup("CHROMEDRIVER_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let headless = parse_flag(&lookup, "HEADLESS", true)?;

        let page_wait_ms = match lookup("PAGE_WAIT_MS") {
            Some(v) => v.trim().parse().map_err(|_| {
                Error::Config(format!("PAGE_WAIT_MS must be a number of milliseconds, got `{}`", v))
            })?,
            None => 0,
        };

        Ok(Self {
            output_dir,
            work_dir,
            repo_base_url,
            source_extensions,
            loc_skip_hidden,
            history_backend,
            issue_source,
            jira_base_url,
            webdriver_url,
            chromedriver_path,
            headless,
            page_wait_ms,
        })
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(v) => match v.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(Error::Config(format!("{} must be true or false, got `{}`", key, v))),
        },
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    pub work_dir: PathBuf,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            work_dir: config.work_dir.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub jira_base_url: String,
    pub webdriver_url: String,
    pub chromedriver_path: Option<PathBuf>,
    pub headless: bool,
    pub page_wait_ms: u64,
}

impl From<&Config> for TrackerConfig {
    fn from(config: &Config) -> Self {
        Self {
            jira_base_url: config.jira_base_url.clone(),
            webdriver_url: config.webdriver_url.clone(),
            chromedriver_path: config.chromedriver_path.clone(),
            headless: config.headless,
            page_wait_ms: config.page_wait_ms,
        }
    }
}
