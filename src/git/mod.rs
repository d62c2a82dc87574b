/*!
 * Version-control metadata for scanned projects
 *
 * Every public function here degrades to `None` or an empty result when the
 * directory is not in a repository, so enrichment never blocks a scan.
 */

mod error;
mod info;

pub use error::{GitError, GitResult};
pub use info::{enrich, last_commits, repo_info, GitInfo, MAX_HISTORY_COMMITS};
