/*!
 * Git repository metadata for the report header
 */

mod error;
mod repository;

pub use error::{GitError, GitResult};
pub use repository::{CommitInfo, Repository, DATE_FORMAT};

use std::fmt;
use std::path::Path;

use tracing::debug;

/// Repository facts shown in the `GIT INFO` section
///
/// Every string is empty when `is_repository` is false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitInfo {
    pub is_repository: bool,
    pub commit: String,
    pub branch: String,
    /// `Name <email>` of the HEAD commit's author
    pub author: String,
    pub date: String,
}

impl fmt::Display for GitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_repository {
            return writeln!(f, "Not a git repository");
        }
        writeln!(f, "- Commit: {}", self.commit)?;
        writeln!(f, "- Branch: {}", self.branch)?;
        writeln!(f, "- Author: {}", self.author)?;
        writeln!(f, "- Date: {}", self.date)
    }
}

/// Look up repository metadata for `path`
///
/// Paths outside any repository, and paths that do not exist, yield
/// [`GitInfo::default`].
pub fn lookup(path: &Path) -> GitInfo {
    if !path.exists() {
        return GitInfo::default();
    }

    match Repository::discover(path).and_then(|repo| repo.info()) {
        Ok(info) => info,
        Err(e) => {
            debug!("No git metadata for {}: {}", path.display(), e);
            GitInfo::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_repo(dir: &Path) -> Result<(), git2::Error> {
        let repo = git2::Repository::init(dir)?;
        fs::write(dir.join("test.txt"), "test content").map_err(|e| git2::Error::from_str(&e.to_string()))?;

        let mut index = repo.index()?;
        index.add_path(Path::new("test.txt"))?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let signature = git2::Signature::now("TestUser", "test@gmail.com")?;
        repo.commit(Some("HEAD"), &signature, &signature, "Initial Commit", &tree, &[])?;
        Ok(())
    }

    #[test]
    fn test_valid_repository() {
        let dir = tempdir().expect("tempdir");
        create_test_repo(dir.path()).expect("create repo");

        let info = lookup(dir.path());
        assert!(info.is_repository);
        assert_eq!(info.commit.len(), 40);
        assert!(info.branch == "main" || info.branch == "master");
        assert!(!info.date.is_empty());
    }

    #[test]
    fn test_author_format() {
        let dir = tempdir().expect("tempdir");
        create_test_repo(dir.path()).expect("create repo");

        let info = lookup(&dir.path().join("test.txt"));
        assert_eq!(info.author, "TestUser <test@gmail.com>");
    }

    #[test]
    fn test_non_git_directory() {
        let dir = tempdir().expect("tempdir");
        let info = lookup(dir.path());
        // a temp dir may still sit inside someone's checkout
        if !info.is_repository {
            assert_eq!(info, GitInfo::default());
        }
    }

    #[test]
    fn test_non_existent_path() {
        let dir = tempdir().expect("tempdir");
        let info = lookup(&dir.path().join("not_existed"));
        assert!(!info.is_repository);
        assert!(info.commit.is_empty());
    }

    #[test]
    fn test_unborn_branch_has_no_commit() {
        let dir = tempdir().expect("tempdir");
        git2::Repository::init(dir.path()).expect("init");

        let info = lookup(dir.path());
        assert!(info.is_repository);
        assert!(info.commit.is_empty());
        assert!(!info.branch.is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(GitInfo::default().to_string(), "Not a git repository\n");

        let info = GitInfo {
            is_repository: true,
            commit: "abc123".to_string(),
            branch: "main".to_string(),
            author: "A <a@b.c>".to_string(),
            date: "2024-01-01 00:00:00 +0000".to_string(),
        };
        assert_eq!(
            info.to_string(),
            "- Commit: abc123\n- Branch: main\n- Author: A <a@b.c>\n- Date: 2024-01-01 00:00:00 +0000\n"
        );
    }
}
