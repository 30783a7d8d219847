/*!
 * Core types and data structures for ctxdump
 */

use std::path::PathBuf;

/// Represents different types of filesystem entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Regular file
    Regular,
    /// Symbolic link to another file
    Symlink,
    /// Directory containing other entries
    Directory,
    /// Other file types
    Other,
}

/// A regular file admitted by the filter during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Path used to open the file
    pub path: PathBuf,
    /// Path relative to the scanned root (the file name for a single-file root)
    pub relative: PathBuf,
}

/// Represents a directory in the file system
#[derive(Debug, Clone, Default)]
pub struct DirectoryNode {
    /// Directory name
    pub name: String,
    /// Relative path from scan root
    pub path: PathBuf,
    /// Directory contents, directories first, each group sorted by name
    pub contents: Vec<Node>,
}

/// Represents a file, or anything else that is not a directory
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File name
    pub name: String,
    /// Relative path from scan root
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Kind of entry
    pub file_type: FileType,
}

/// A generic filesystem node
#[derive(Debug, Clone)]
pub enum Node {
    /// Directory node
    Directory(DirectoryNode),
    /// File, symlink or special file
    File(FileNode),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Directory(dir) => &dir.name,
            Node::File(file) => &file.name,
        }
    }
}

impl DirectoryNode {
    /// Count of files (non-directories) in the whole subtree
    pub fn file_count(&self) -> usize {
        self.contents
            .iter()
            .map(|node| match node {
                Node::Directory(dir) => dir.file_count(),
                Node::File(_) => 1,
            })
            .sum()
    }
}
