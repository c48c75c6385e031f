use git2::{Commit, Oid, Repository, Signature, Time};
use std::fs;
use std::path::Path;

/// 2006-01-02 15:04:05 UTC
pub(crate) const FIRST_COMMIT_SECONDS: i64 = 1_136_214_245;

pub(crate) fn commit_file(
    repo: &Repository,
    file: &str,
    contents: &str,
    author: &str,
    when: Time,
    parents: &[Oid],
    update_ref: Option<&str>,
) -> Oid {
    let workdir = repo.workdir().expect("fixture repositories are not bare");
    let full = workdir.join(file);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&full, contents).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let email = format!("{}@example.org", author.to_lowercase());
    let signature = Signature::new(author, &email, &when).unwrap();

    let parents: Vec<Commit> = parents
        .iter()
        .map(|id| repo.find_commit(*id).unwrap())
        .collect();
    let parent_refs: Vec<&Commit> = parents.iter().collect();

    repo.commit(
        update_ref,
        &signature,
        &signature,
        &format!("Update {}", file),
        &tree,
        &parent_refs,
    )
    .unwrap()
}

/// Four commits by three authors plus a merge by a fourth:
///
/// ```text
/// Alice ── Bob ──── Dave (merge, HEAD)
///     └── Carol ──┘
/// ```
pub(crate) fn sample_history(path: &Path) -> Repository {
    let repo = Repository::init(path).unwrap();
    let day = 86_400;

    let first = commit_file(
        &repo,
        "src/main/java/Main.java",
        "class Main {\n}\n",
        "Alice",
        Time::new(FIRST_COMMIT_SECONDS, 0),
        &[],
        Some("HEAD"),
    );
    let second = commit_file(
        &repo,
        "src/main/java/Util.java",
        "class Util {\n  int x;\n}\n",
        "Bob",
        Time::new(FIRST_COMMIT_SECONDS + day, 60),
        &[first],
        Some("HEAD"),
    );
    let side = commit_file(
        &repo,
        "docs/notes.txt",
        "notes\n",
        "Carol",
        Time::new(FIRST_COMMIT_SECONDS + 2 * day, 0),
        &[first],
        None,
    );
    commit_file(
        &repo,
        "docs/merged.txt",
        "merged\n",
        "Dave",
        Time::new(FIRST_COMMIT_SECONDS + 3 * day, 0),
        &[second, side],
        Some("HEAD"),
    );

    repo
}
