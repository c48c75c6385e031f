use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

use crate::config::TrackerConfig;
use crate::error::{Error, Result};
use crate::tracker::parser::parse_issue_count;
use crate::tracker::provider::IssueCounter;
use crate::tracker::webdriver::{chrome_capabilities, ChromeDriverProcess, WebDriverSession};

/// Absolute path of the "Showing 1-50 of N" counter on JIRA's issue
/// navigator. Any layout change on the page makes the lookup come back empty.
pub const ISSUE_COUNT_XPATH: &str = "/html/body/div[1]/div[2]/div[1]/main/div/div[2]/div/div/div/div/div/div[2]/div[2]/div/div[1]/div/div[1]/span";

/// Reads issue totals off JIRA's rendered search page in a headless browser.
pub struct BrowserIssueCounter {
    client: Client,
    endpoint: String,
    search_base: String,
    headless: bool,
    page_wait: Duration,
    _driver: Option<ChromeDriverProcess>,
}

impl BrowserIssueCounter {
    /// Connect to the configured WebDriver endpoint, spawning chromedriver
    /// first when a binary path is configured.
    pub async fn new(config: &TrackerConfig) -> Result<Self> {
        let client = Client::builder().build()?;

        let driver = match &config.chromedriver_path {
            Some(path) => {
                let driver = ChromeDriverProcess::spawn(&client, path, &config.webdriver_url).await?;
                tracing::info!(
                    "chromedriver ready at {} (pid {:?})",
                    driver.endpoint(),
                    driver.pid()
                );
                Some(driver)
            }
            None => None,
        };

        Ok(Self {
            client,
            endpoint: config.webdriver_url.clone(),
            search_base: config.jira_base_url.trim_end_matches('/').to_string(),
            headless: config.headless,
            page_wait: Duration::from_millis(config.page_wait_ms),
            _driver: driver,
        })
    }

    pub fn search_url(&self, project: &str) -> Result<String> {
        search_url(&self.search_base, project)
    }

    /// Text of the counter element, or `None` when the page has no such element.
    pub async fn read_counter_text(&self, project: &str) -> Result<Option<String>> {
        let url = self.search_url(project)?;
        let session =
            WebDriverSession::start(&self.client, &self.endpoint, chrome_capabilities(self.headless))
                .await?;

        let text: Result<Option<String>> = async {
            if !self.page_wait.is_zero() {
                session.set_implicit_wait(self.page_wait).await?;
            }
            session.navigate(&url).await?;

            let elements = session.find_elements_by_xpath(ISSUE_COUNT_XPATH).await?;
            match elements.first() {
                Some(element) => Ok(Some(session.element_text(element).await?)),
                None => {
                    tracing::debug!("No issue counter on {} for {}", url, project);
                    Ok(None)
                }
            }
        }
        .await;

        let session_id = session.id().to_string();
        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close browser session {}: {}", session_id, e);
        }

        text
    }
}

#[async_trait]
impl IssueCounter for BrowserIssueCounter {
    async fn fetch_issue_count(&self, project: &str) -> Result<u64> {
        let text = self.read_counter_text(project).await?;
        Ok(parse_issue_count(text.as_deref()))
    }

    fn name(&self) -> &str {
        "browser"
    }
}

/// `<jira>/issues/?jql=project=<project>`
pub fn search_url(jira_base: &str, project: &str) -> Result<String> {
    let mut url = Url::parse(&format!("{}/issues/", jira_base.trim_end_matches('/')))
        .map_err(|e| Error::Config(format!("invalid JIRA URL `{}`: {}", jira_base, e)))?;
    url.query_pairs_mut()
        .append_pair("jql", &format!("project={}", project));
    Ok(url.into())
}
