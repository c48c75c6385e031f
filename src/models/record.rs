use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Calendar date of a repository's earliest commit.
///
/// `Unknown` is the sentinel recorded when there was no repository to look
/// at; it serializes as the bare number `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstCommitDate {
    On(NaiveDate),
    Unknown,
}

impl Serialize for FirstCommitDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FirstCommitDate::On(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            FirstCommitDate::Unknown => serializer.serialize_u8(0),
        }
    }
}

/// One row of the repository metrics table.
///
/// A `None` metric means the query behind it failed; the cell is left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryMetricsRecord {
    pub project_name: String,
    pub revision_count: Option<u64>,
    pub author_count: Option<u64>,
    pub source_file_count: Option<u64>,
    pub source_line_count: Option<u64>,
    pub first_commit_date: Option<FirstCommitDate>,
}

impl RepositoryMetricsRecord {
    /// Record written for a project whose repository does not exist.
    pub fn not_found(project_name: &str) -> Self {
        Self {
            project_name: project_name.to_string(),
            revision_count: Some(0),
            author_count: Some(0),
            source_file_count: Some(0),
            source_line_count: Some(0),
            first_commit_date: Some(FirstCommitDate::Unknown),
        }
    }

    pub fn missing_fields(&self) -> usize {
        [
            self.revision_count.is_none(),
            self.author_count.is_none(),
            self.source_file_count.is_none(),
            self.source_line_count.is_none(),
            self.first_commit_date.is_none(),
        ]
        .iter()
        .filter(|missing| **missing)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueCountRecord {
    pub project_name: String,
    pub issue_count: u64,
}
