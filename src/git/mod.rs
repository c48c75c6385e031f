pub mod cloner;
pub mod history;
pub mod workdir;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cloner::{CloneOutcome, GitCloner, RepositoryCloner};
pub use history::{GitCliHistory, HistoryQueries, LibGitHistory};
pub use workdir::{remove_repo_directory, WorkingCopy};
