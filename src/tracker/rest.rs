use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::tracker::provider::IssueCounter;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total: u64,
}

/// Issue totals from JIRA's REST search endpoint. Unlike the rendered page
/// this does not depend on the navigator's markup.
pub struct JiraRestClient {
    client: Client,
    base_url: String,
}

impl JiraRestClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("apache-metrics/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn search_endpoint(&self) -> String {
        format!("{}/rest/api/2/search", self.base_url)
    }
}

#[async_trait]
impl IssueCounter for JiraRestClient {
    async fn fetch_issue_count(&self, project: &str) -> Result<u64> {
        let jql = format!("project={}", project);
        tracing::debug!("Searching JIRA: {}", jql);

        let response = self
            .client
            .get(self.search_endpoint())
            .query(&[("jql", jql.as_str()), ("maxResults", "0"), ("fields", "id")])
            .send()
            .await?;

        // JIRA answers 400 for a JQL naming a project it does not know.
        if response.status() == StatusCode::BAD_REQUEST {
            tracing::debug!("JIRA has no project {}", project);
            return Ok(0);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::IssueTracker(format!(
                "Search for {} failed: {} - {}",
                project, status, body
            )));
        }

        let search: SearchResponse = response.json().await?;
        Ok(search.total)
    }

    fn name(&self) -> &str {
        "rest"
    }
}
