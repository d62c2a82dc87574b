/*!
 * Repository and per-file commit information
 */

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use git2::{Commit, Repository, Sort};
use serde::Serialize;
use tracing::debug;

use super::error::{GitError, GitResult};
use crate::types::{CommitSummary, FileRecord};
use crate::utils::normalize_relative_path;

/// Upper bound on commits inspected when resolving per-file history
pub const MAX_HISTORY_COMMITS: usize = 1000;

/// Repository state at scan time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitInfo {
    /// Current branch, or `HEAD` when detached
    pub branch: String,
    /// Full id of the head commit
    pub commit: String,
    /// Abbreviated id of the head commit
    pub short_commit: String,
    /// Head commit author
    pub author: String,
    /// Head commit time, RFC 3339
    pub date: String,
    /// First line of the head commit message
    pub summary: String,
    /// URL of the `origin` remote, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

/// Repository metadata for the repository containing `root`
pub fn repo_info(root: &Path) -> Option<GitInfo> {
    match read_repo_info(root) {
        Ok(info) => Some(info),
        Err(e) => {
            debug!("No git information for {}: {}", root.display(), e);
            None
        }
    }
}

fn read_repo_info(root: &Path) -> GitResult<GitInfo> {
    let repo = Repository::discover(root).map_err(GitError::OpenError)?;
    let head = repo.head().map_err(GitError::HeadError)?;

    let branch = if head.is_branch() {
        head.shorthand().unwrap_or("HEAD").to_string()
    } else {
        "HEAD".to_string()
    };

    let commit = head.peel_to_commit().map_err(GitError::HeadError)?;
    let summary = summarize(&commit);
    let remote = repo
        .find_remote("origin")
        .ok()
        .and_then(|remote| remote.url().map(str::to_string));

    Ok(GitInfo {
        branch,
        commit: commit.id().to_string(),
        short_commit: summary.id.clone(),
        author: summary.author,
        date: summary.date,
        summary: summary.summary,
        remote,
    })
}

/// Most recent commit touching each of `paths` (relative to `root`)
///
/// History is walked once from HEAD, newest first, for at most
/// `MAX_HISTORY_COMMITS` commits. Paths not touched in that window are absent.
pub fn last_commits(root: &Path, paths: &[&str]) -> HashMap<String, CommitSummary> {
    match read_last_commits(root, paths) {
        Ok(found) => found,
        Err(e) => {
            debug!("No file history for {}: {}", root.display(), e);
            HashMap::new()
        }
    }
}

fn read_last_commits(root: &Path, paths: &[&str]) -> GitResult<HashMap<String, CommitSummary>> {
    let repo = Repository::discover(root).map_err(GitError::OpenError)?;
    let prefix = root_prefix(&repo, root)?;

    // Repository-relative path -> scan-relative path
    let mut wanted: HashMap<String, &str> = paths
        .iter()
        .map(|path| {
            let in_repo = if prefix.is_empty() {
                path.to_string()
            } else {
                format!("{}/{}", prefix, path)
            };
            (in_repo, *path)
        })
        .collect();

    let mut found = HashMap::new();
    let mut walk = repo.revwalk()?;
    walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    walk.push_head().map_err(GitError::HeadError)?;

    for oid in walk.take(MAX_HISTORY_COMMITS) {
        if wanted.is_empty() {
            break;
        }

        let commit = repo.find_commit(oid?)?;
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let mut cached = None;
        for delta in diff.deltas() {
            let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) else {
                continue;
            };
            let key = normalize_relative_path(path);
            if let Some(scan_path) = wanted.remove(&key) {
                let summary = cached.get_or_insert_with(|| summarize(&commit));
                found.insert(scan_path.to_string(), summary.clone());
            }
        }
    }

    Ok(found)
}

/// Location of `root` inside the repository's working directory, `/`-separated
fn root_prefix(repo: &Repository, root: &Path) -> GitResult<String> {
    let workdir = repo
        .workdir()
        .ok_or_else(|| GitError::Bare(repo.path().display().to_string()))?;
    let workdir = canonical(workdir);
    let root = canonical(root);

    Ok(root
        .strip_prefix(&workdir)
        .map(normalize_relative_path)
        .unwrap_or_default())
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn summarize(commit: &Commit<'_>) -> CommitSummary {
    let id = commit.id().to_string();
    let date = chrono::DateTime::from_timestamp(commit.time().seconds(), 0)
        .map(|time| time.to_rfc3339())
        .unwrap_or_default();

    CommitSummary {
        id: id.chars().take(7).collect(),
        author: commit.author().name().unwrap_or("unknown").to_string(),
        date,
        summary: commit.summary().unwrap_or_default().to_string(),
    }
}

/// Attach the last commit to every record it can be resolved for
pub fn enrich(records: &mut [FileRecord], root: &Path) {
    let paths: Vec<&str> = records
        .iter()
        .map(|record| record.relative_path.as_str())
        .collect();
    let mut commits = last_commits(root, &paths);

    for record in records.iter_mut() {
        record.last_commit = commits.remove(&record.relative_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn commit_file(repo: &Repository, relative: &str, content: &str, message: &str) {
        let workdir = repo.workdir().unwrap().to_path_buf();
        let path = workdir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(&path).unwrap().write_all(content.as_bytes()).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(relative)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let signature = git2::Signature::now("Test Author", "test@example.com").unwrap();

        let parents: Vec<Commit<'_>> = repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parent_refs)
            .unwrap();
    }

    #[test]
    fn test_repo_info_outside_repository() {
        let dir = tempdir().unwrap();
        assert!(repo_info(dir.path()).is_none());
        assert!(last_commits(dir.path(), &["a.js"]).is_empty());
    }

    #[test]
    fn test_repo_info_and_last_commits() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_file(&repo, "src/a.js", "one", "Add a");
        commit_file(&repo, "src/b.js", "two", "Add b");
        commit_file(&repo, "src/a.js", "three", "Update a");

        let info = repo_info(dir.path()).unwrap();
        assert_eq!(info.summary, "Update a");
        assert_eq!(info.author, "Test Author");
        assert_eq!(info.short_commit.len(), 7);

        let commits = last_commits(&dir.path().join("src"), &["a.js", "b.js", "c.js"]);
        assert_eq!(commits["a.js"].summary, "Update a");
        assert_eq!(commits["b.js"].summary, "Add b");
        assert!(!commits.contains_key("c.js"));
    }
}
