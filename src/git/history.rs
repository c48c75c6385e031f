use chrono::{DateTime, FixedOffset, NaiveDate};
use git2::{Repository, Sort};
use std::collections::HashSet;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Layout of git's default `%ad` date, e.g. `Mon Jan 2 15:04:05 2006 +0000`.
pub const LOG_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Read-only history queries against a cloned repository.
pub trait HistoryQueries: Send + Sync {
    /// Commits reachable from HEAD.
    fn revision_count(&self, repo: &Path) -> Result<u64>;

    /// Distinct author names over non-merge commits reachable from HEAD.
    fn author_count(&self, repo: &Path) -> Result<u64>;

    /// Date of the earliest commit in the history listing.
    fn first_commit_date(&self, repo: &Path) -> Result<NaiveDate>;

    fn name(&self) -> &str;
}

/// Parse one line of `git log --pretty=format:%ad` into a calendar date.
///
/// Surrounding quotes are stripped; the time of day and zone are dropped
/// after the timestamp has been read in its own offset.
pub fn parse_log_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim().trim_matches(|c| c == '\'' || c == '"').trim();
    let timestamp = DateTime::parse_from_str(trimmed, LOG_DATE_FORMAT)?;
    Ok(timestamp.date_naive())
}

fn signature_date(when: git2::Time) -> Result<NaiveDate> {
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60).ok_or_else(|| {
        Error::ParseError(format!("invalid zone offset {} minutes", when.offset_minutes()))
    })?;
    let utc = DateTime::from_timestamp(when.seconds(), 0)
        .ok_or_else(|| Error::ParseError(format!("invalid timestamp {}", when.seconds())))?;
    Ok(utc.with_timezone(&offset).date_naive())
}

pub struct LibGitHistory;

impl LibGitHistory {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LibGitHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryQueries for LibGitHistory {
    fn revision_count(&self, repo: &Path) -> Result<u64> {
        let repo = Repository::open(repo)?;
        let mut revwalk = repo.revwalk()?;
        revwalk.push_head()?;

        let mut count = 0;
        for oid in revwalk {
            oid?;
            count += 1;
        }
        Ok(count)
    }

    fn author_count(&self, repo: &Path) -> Result<u64> {
        let repo = Repository::open(repo)?;
        let mailmap = repo.mailmap().ok();
        let mut revwalk = repo.revwalk()?;
        revwalk.push_head()?;

        let mut authors = HashSet::new();
        for oid in revwalk {
            let commit = repo.find_commit(oid?)?;
            if commit.parent_count() > 1 {
                continue;
            }
            let author = match &mailmap {
                Some(mailmap) => commit.author_with_mailmap(mailmap)?,
                None => commit.author(),
            };
            authors.insert(String::from_utf8_lossy(author.name_bytes()).into_owned());
        }
        Ok(authors.len() as u64)
    }

    fn first_commit_date(&self, repo: &Path) -> Result<NaiveDate> {
        let repo = Repository::open(repo)?;
        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        let mut last = None;
        for oid in revwalk {
            last = Some(oid?);
        }
        let oid = last.ok_or_else(|| Error::ParseError("history is empty".to_string()))?;
        let commit = repo.find_commit(oid)?;
        let when = commit.author().when();
        signature_date(when)
    }

    fn name(&self) -> &str {
        "libgit2"
    }
}

/// History queries answered by the `git` executable.
pub struct GitCliHistory {
    program: String,
}

impl GitCliHistory {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run a git subcommand in `repo` and return its standard output.
    ///
    /// With `reject_diagnostics`, anything written to standard error fails
    /// the query even if git exited successfully.
    fn run(&self, repo: &Path, args: &[&str], reject_diagnostics: bool) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(repo)
            .stdin(Stdio::null())
            .output()?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || (reject_diagnostics && !stderr.trim().is_empty()) {
            return Err(Error::QueryDiagnostic {
                command: format!("git {}", args.join(" ")),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GitCliHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryQueries for GitCliHistory {
    fn revision_count(&self, repo: &Path) -> Result<u64> {
        let output = self.run(repo, &["rev-list", "--count", "HEAD"], true)?;
        parse_count(&output)
    }

    fn author_count(&self, repo: &Path) -> Result<u64> {
        let output = self.run(repo, &["shortlog", "-sn", "--no-merges", "HEAD"], false)?;
        Ok(count_lines(&output))
    }

    fn first_commit_date(&self, repo: &Path) -> Result<NaiveDate> {
        let output = self.run(repo, &["log", "--pretty=format:%ad"], false)?;
        let last = last_line(&output)
            .ok_or_else(|| Error::ParseError("git log printed no history".to_string()))?;
        parse_log_date(last)
    }

    fn name(&self) -> &str {
        "git"
    }
}

pub fn parse_count(output: &str) -> Result<u64> {
    output
        .trim()
        .parse()
        .map_err(|_| Error::ParseError(format!("expected a count, got `{}`", output.trim())))
}

pub fn count_lines(output: &str) -> u64 {
    output.lines().filter(|line| !line.trim().is_empty()).count() as u64
}

fn last_line(output: &str) -> Option<&str> {
    output.lines().rev().find(|line| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fixtures::sample_history;

    #[test]
    fn test_parse_quoted_log_date() {
        let date = parse_log_date("'Mon Jan 02 15:04:05 2006 +0000'").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2006, 1, 2).unwrap());
    }

    #[test]
    fn test_parse_git_default_date_keeps_author_zone() {
        // 23:30 on the 1st in UTC-5 is already the 2nd in UTC.
        let date = parse_log_date("Sun Jan 1 23:30:00 2006 -0500\n").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2006, 1, 1).unwrap());
    }

    #[test]
    fn test_parse_log_date_rejects_garbage() {
        assert!(matches!(parse_log_date("yesterday"), Err(Error::Date(_))));
        assert!(parse_log_date("").is_err());
    }

    #[test]
    fn test_output_helpers() {
        assert_eq!(parse_count("  42\n").unwrap(), 42);
        assert!(parse_count("fatal").is_err());
        assert_eq!(count_lines("    10\tAlice\n     3\tBob\n"), 2);
        assert_eq!(count_lines(""), 0);
        assert_eq!(
            last_line("Tue Jan 3 10:00:00 2006 +0000\nMon Jan 2 15:04:05 2006 +0000"),
            Some("Mon Jan 2 15:04:05 2006 +0000")
        );
        assert_eq!(last_line("\n"), None);
    }

    #[test]
    fn test_libgit_queries_on_sample_history() {
        let dir = tempfile::tempdir().unwrap();
        sample_history(dir.path());
        let history = LibGitHistory::new();

        assert_eq!(history.revision_count(dir.path()).unwrap(), 4);
        // The merge author is not counted.
        assert_eq!(history.author_count(dir.path()).unwrap(), 3);
        assert_eq!(
            history.first_commit_date(dir.path()).unwrap(),
            NaiveDate::from_ymd_opt(2006, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_first_commit_date_uses_author_offset() {
        let dir = tempfile::tempdir().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        // 2006-01-02 01:00 UTC, authored at UTC-2.
        crate::git::fixtures::commit_file(
            &repo,
            "A.java",
            "class A {}\n",
            "Erin",
            git2::Time::new(1_136_163_600, -120),
            &[],
            Some("HEAD"),
        );

        let date = LibGitHistory::new().first_commit_date(dir.path()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2006, 1, 1).unwrap());
    }

    #[test]
    fn test_libgit_queries_fail_without_commits() {
        let dir = tempfile::tempdir().unwrap();
        git2::Repository::init(dir.path()).unwrap();
        let history = LibGitHistory::new();

        assert!(history.revision_count(dir.path()).is_err());
        assert!(history.first_commit_date(dir.path()).is_err());
    }

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_cli_queries_agree_with_libgit() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        sample_history(dir.path());
        let cli = GitCliHistory::new();
        let native = LibGitHistory::new();

        assert_eq!(cli.revision_count(dir.path()).unwrap(), 4);
        assert_eq!(cli.author_count(dir.path()).unwrap(), 3);
        assert_eq!(
            cli.first_commit_date(dir.path()).unwrap(),
            NaiveDate::from_ymd_opt(2006, 1, 2).unwrap()
        );
        assert_eq!(
            cli.revision_count(dir.path()).unwrap(),
            native.revision_count(dir.path()).unwrap()
        );
        assert_eq!(
            cli.first_commit_date(dir.path()).unwrap(),
            native.first_commit_date(dir.path()).unwrap()
        );
    }

    #[test]
    fn test_cli_queries_on_unborn_head_are_diagnostics() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        git2::Repository::init(dir.path()).unwrap();
        let cli = GitCliHistory::new();

        match cli.revision_count(dir.path()) {
            Err(Error::QueryDiagnostic { command, stderr }) => {
                assert_eq!(command, "git rev-list --count HEAD");
                assert!(!stderr.is_empty());
            }
            other => panic!("expected a diagnostic, got {:?}", other),
        }
        assert!(matches!(
            cli.author_count(dir.path()),
            Err(Error::QueryDiagnostic { .. })
        ));
        assert!(cli.first_commit_date(dir.path()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_revision_count_rejects_stderr_on_success() {
        // `sh rev-list ...` runs ./rev-list: exit 0, a count, and a warning.
        let dir = tempfile::tempdir().unwrap();
        let script = "echo 12\necho 'warning: refname HEAD is ambiguous' >&2\n";
        std::fs::write(dir.path().join("rev-list"), script).unwrap();
        std::fs::write(dir.path().join("shortlog"), script).unwrap();
        let cli = GitCliHistory::with_program("sh");

        match cli.revision_count(dir.path()) {
            Err(Error::QueryDiagnostic { stderr, .. }) => {
                assert_eq!(stderr, "warning: refname HEAD is ambiguous");
            }
            other => panic!("expected a diagnostic, got {:?}", other),
        }
        // Only rev-list treats a warning as fatal.
        assert_eq!(cli.author_count(dir.path()).unwrap(), 1);
    }

    #[test]
    fn test_cli_queries_without_executable_fail() {
        let dir = tempfile::tempdir().unwrap();
        let cli = GitCliHistory::with_program("no-such-git-executable");

        assert!(matches!(cli.revision_count(dir.path()), Err(Error::Io(_))));
        assert!(cli.first_commit_date(dir.path()).is_err());
    }
}
