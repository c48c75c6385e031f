use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::Result;
use crate::models::ProjectDescriptor;

/// Exit status git uses for fatal errors, including a missing remote.
pub const GIT_FATAL_EXIT: i32 = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    Success,
    NotFound,
    OtherFailure { code: Option<i32>, stderr: String },
}

impl CloneOutcome {
    pub fn from_exit(code: Option<i32>, stderr: &str) -> Self {
        match code {
            Some(0) => CloneOutcome::Success,
            Some(GIT_FATAL_EXIT) => CloneOutcome::NotFound,
            code => CloneOutcome::OtherFailure {
                code,
                stderr: stderr.trim().to_string(),
            },
        }
    }
}

#[async_trait]
pub trait RepositoryCloner: Send + Sync {
    /// Materialize `project` into `dest`, which must not exist yet.
    async fn clone_repository(&self, project: &ProjectDescriptor, dest: &Path)
        -> Result<CloneOutcome>;
}

pub struct GitCloner {
    program: String,
}

impl GitCloner {
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
}

impl Default for GitCloner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryCloner for GitCloner {
    async fn clone_repository(
        &self,
        project: &ProjectDescriptor,
        dest: &Path,
    ) -> Result<CloneOutcome> {
        tracing::debug!("git clone {} {}", project.source_url, dest.display());

        // A missing GitHub repository answers 401, which would otherwise
        // block on a credential prompt.
        let output = Command::new(&self.program)
            .arg("clone")
            .arg("--quiet")
            .arg(&project.source_url)
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(CloneOutcome::from_exit(output.status.code(), &stderr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_mapping() {
        assert_eq!(CloneOutcome::from_exit(Some(0), ""), CloneOutcome::Success);
        assert_eq!(
            CloneOutcome::from_exit(Some(128), "fatal: repository not found"),
            CloneOutcome::NotFound
        );
        assert_eq!(
            CloneOutcome::from_exit(Some(1), "  error: boom\n"),
            CloneOutcome::OtherFailure {
                code: Some(1),
                stderr: "error: boom".to_string()
            }
        );
        assert!(matches!(
            CloneOutcome::from_exit(None, ""),
            CloneOutcome::OtherFailure { code: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let cloner = GitCloner::with_program("definitely-not-a-git-binary");
        let project = ProjectDescriptor::new("ant", "https://example.invalid");
        let dir = tempfile::tempdir().unwrap();
        let result = cloner.clone_repository(&project, &dir.path().join("ant")).await;
        assert!(result.is_err());
    }
}
