/*!
 * Read-only access to the repository enclosing a scanned path
 */

use std::path::Path;

use chrono::{DateTime, FixedOffset};
use git2::{ErrorCode, Repository as Git2Repository};

use super::error::{GitError, GitResult};
use super::GitInfo;

/// Format used for commit dates
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Repository discovered from a path inside its work tree
pub struct Repository {
    /// Inner git2 repository instance
    inner: Git2Repository,
}

impl Repository {
    /// Discover the repository containing `path`, searching parent directories
    pub fn discover(path: &Path) -> GitResult<Self> {
        let start = if path.is_file() {
            path.parent().unwrap_or(path)
        } else {
            path
        };
        let repo = Git2Repository::discover(start).map_err(GitError::OpenError)?;

        Ok(Self { inner: repo })
    }

    /// Current branch name, or `HEAD` when detached
    pub fn branch(&self) -> GitResult<String> {
        match self.inner.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().unwrap_or("HEAD").to_string()),
            Ok(_) => Ok("HEAD".to_string()),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                // no commits yet: HEAD still names the branch symbolically
                let head = self.inner.find_reference("HEAD")?;
                let target = head.symbolic_target().unwrap_or("HEAD");
                Ok(target.trim_start_matches("refs/heads/").to_string())
            }
            Err(e) => Err(GitError::HeadError(e)),
        }
    }

    /// Metadata of the HEAD commit, `None` for an unborn branch
    pub fn head_commit(&self) -> GitResult<Option<CommitInfo>> {
        let head = match self.inner.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(GitError::HeadError(e)),
        };
        let commit = head.peel_to_commit().map_err(GitError::HeadError)?;
        let author = commit.author();

        let time = commit.time();
        let date = format_commit_time(time.seconds(), time.offset_minutes())?;

        Ok(Some(CommitInfo {
            id: commit.id().to_string(),
            author: format!(
                "{} <{}>",
                author.name().unwrap_or_default(),
                author.email().unwrap_or_default()
            ),
            date,
        }))
    }

    /// Collect everything the report shows about this repository
    pub fn info(&self) -> GitResult<GitInfo> {
        let branch = self.branch()?;
        let commit = self.head_commit()?.unwrap_or_default();

        Ok(GitInfo {
            is_repository: true,
            commit: commit.id,
            branch,
            author: commit.author,
            date: commit.date,
        })
    }
}

/// HEAD commit details
#[derive(Debug, Clone, Default)]
pub struct CommitInfo {
    pub id: String,
    pub author: String,
    pub date: String,
}

fn format_commit_time(seconds: i64, offset_minutes: i32) -> GitResult<String> {
    let utc = DateTime::from_timestamp(seconds, 0).ok_or(GitError::InvalidTime(seconds))?;

    Ok(match FixedOffset::east_opt(offset_minutes * 60) {
        Some(offset) => utc.with_timezone(&offset).format(DATE_FORMAT).to_string(),
        None => utc.format(DATE_FORMAT).to_string(),
    })
}
