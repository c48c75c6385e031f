use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{IssueCountRecord, RepositoryMetricsRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    RepositoryMetrics,
    IssueCounts,
}

impl TableKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::RepositoryMetrics => "ApacheProjectMetrics.csv",
            TableKind::IssueCounts => "JiraIssues.csv",
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        match self {
            TableKind::RepositoryMetrics => &[
                "Project Name",
                "Number of Revisions",
                "Number of Authors",
                "Number of Source Files",
                "Number of Source LOC",
                "Date of First Commit",
            ],
            TableKind::IssueCounts => &["Project Name", "Total Number of JIRA Issues"],
        }
    }
}

/// A record that is written as one row of a known table.
pub trait TableRow: Serialize {
    const KIND: TableKind;
}

impl TableRow for RepositoryMetricsRecord {
    const KIND: TableKind = TableKind::RepositoryMetrics;
}

impl TableRow for IssueCountRecord {
    const KIND: TableKind = TableKind::IssueCounts;
}

/// Writes output tables as CSV with every non-numeric field quoted.
pub struct ResultWriter {
    dir: PathBuf,
}

impl ResultWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn table_path(&self, kind: TableKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Truncate (or create) the table and write its header row.
    pub fn create_table(&self, kind: TableKind) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let file = File::create(self.table_path(kind))?;
        let mut writer = table_writer(file);
        writer.write_record(kind.header())?;
        writer.flush()?;
        tracing::debug!("Created {}", self.table_path(kind).display());
        Ok(())
    }

    /// Append a single row to the record's table.
    pub fn append_row<R: TableRow>(&self, record: &R) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.table_path(R::KIND))?;
        let mut writer = table_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

fn table_writer(file: File) -> csv::Writer<File> {
    WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::NonNumeric)
        .terminator(Terminator::CRLF)
        .from_writer(file)
}
