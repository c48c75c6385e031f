use async_trait::async_trait;
use crate::error::Result;

#[async_trait]
pub trait IssueCounter: Send + Sync {
    /// Total issues the tracker reports for `project`. A page or query that
    /// shows no count yields 0; only transport failures are errors.
    async fn fetch_issue_count(&self, project: &str) -> Result<u64>;
    fn name(&self) -> &str;
}
