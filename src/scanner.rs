/*!
 * Directory walking and file admission
 *
 * The walk is sequential and sorted by file name. Entries that cannot be read
 * are logged and skipped; they never abort the walk.
 */

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::filter::FilterManager;
use crate::types::{DirectoryNode, FileNode, FileType, Node, ScannedFile};

/// Version control metadata directories that are never descended
pub const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn", ".bzr"];

/// Scanner for directory contents
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Admission decisions for files
    filter: FilterManager,
    /// Whether to respect .gitignore files
    respect_gitignore: bool,
    /// Absolute path of the report file, never scanned
    output_file: Option<PathBuf>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: &Config) -> Self {
        Self {
            filter: FilterManager::new(&config.filters),
            respect_gitignore: config.respect_gitignore,
            output_file: config
                .output_file
                .as_deref()
                .and_then(|p| std::path::absolute(p).ok()),
        }
    }

    pub fn filter(&self) -> &FilterManager {
        &self.filter
    }

    /// Regular files under `root` admitted by the filter, in walk order
    ///
    /// A file root yields at most itself, matched by its file name.
    pub fn files(&self, root: &Path) -> Vec<ScannedFile> {
        if root.is_file() {
            let relative = PathBuf::from(root.file_name().unwrap_or(root.as_os_str()));
            return self
                .admit(root.to_path_buf(), relative)
                .into_iter()
                .collect();
        }

        self.walk(root)
            .into_iter()
            .filter(|path| path.is_file())
            .filter_map(|path| match path.strip_prefix(root) {
                Ok(relative) => {
                    let relative = relative.to_path_buf();
                    self.admit(path, relative)
                }
                Err(_) => {
                    warn!("Skipping {}: not under {}", path.display(), root.display());
                    None
                }
            })
            .collect()
    }

    /// Directory tree of `root` for the structure section
    ///
    /// The include/exclude filter is not applied here; only the report file is left out.
    pub fn structure(&self, root: &Path) -> DirectoryNode {
        let mut tree = DirectoryNode {
            name: display_name(root),
            path: PathBuf::new(),
            contents: Vec::new(),
        };

        if root.is_file() {
            let relative = PathBuf::from(&tree.name);
            if let Some(node) = file_node(root, &relative) {
                tree.contents.push(node);
            }
            return tree;
        }

        for path in self.walk(root) {
            if self.is_output_file(&path) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let mut parents: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect();
            let Some(name) = parents.pop() else {
                continue;
            };

            let node = match fs::symlink_metadata(&path) {
                Ok(meta) if meta.is_dir() => Node::Directory(DirectoryNode {
                    name,
                    path: relative.to_path_buf(),
                    contents: Vec::new(),
                }),
                Ok(_) => match file_node(&path, relative) {
                    Some(node) => node,
                    None => continue,
                },
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            insert_node(&mut tree, &parents, node);
        }

        sort_tree(&mut tree);
        tree
    }

    fn admit(&self, path: PathBuf, relative: PathBuf) -> Option<ScannedFile> {
        if self.is_output_file(&path) || !self.filter.is_matching_filters(&relative) {
            return None;
        }
        debug!("Admitted {}", relative.display());
        Some(ScannedFile { path, relative })
    }

    /// Whether `path` is the report being written
    pub fn is_output_file(&self, path: &Path) -> bool {
        match (&self.output_file, std::path::absolute(path)) {
            (Some(output), Ok(path)) => &path == output,
            _ => false,
        }
    }

    /// Every entry below `root` (root excluded), pre-order, sorted by name
    fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut entries = Vec::new();

        if self.respect_gitignore {
            let walker = WalkBuilder::new(root)
                .hidden(false)
                .require_git(false)
                .sort_by_file_name(|a, b| a.cmp(b))
                .filter_entry(|entry| !is_vcs_dir(entry.file_name(), entry.depth()))
                .build();

            for entry in walker {
                match entry {
                    Ok(entry) if entry.depth() == 0 => {}
                    Ok(entry) => entries.push(entry.into_path()),
                    Err(e) => warn!("Skipping entry under {}: {}", root.display(), e),
                }
            }
        } else {
            let walker = WalkDir::new(root)
                .min_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| !is_vcs_dir(entry.file_name(), entry.depth()));

            for entry in walker {
                match entry {
                    Ok(entry) => entries.push(entry.into_path()),
                    Err(e) => warn!("Skipping entry under {}: {}", root.display(), e),
                }
            }
        }

        entries
    }
}

fn is_vcs_dir(name: &std::ffi::OsStr, depth: usize) -> bool {
    depth > 0 && VCS_DIRS.iter().any(|dir| name == *dir)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_node(path: &Path, relative: &Path) -> Option<Node> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };
    let file_type = if meta.file_type().is_symlink() {
        FileType::Symlink
    } else if meta.is_file() {
        FileType::Regular
    } else if meta.is_dir() {
        FileType::Directory
    } else {
        FileType::Other
    };

    Some(Node::File(FileNode {
        name: display_name(path),
        path: relative.to_path_buf(),
        size: meta.len(),
        file_type,
    }))
}

fn insert_node(dir: &mut DirectoryNode, parents: &[String], node: Node) {
    let Some((first, rest)) = parents.split_first() else {
        let duplicate = matches!(&node, Node::Directory(new) if dir
            .contents
            .iter()
            .any(|n| matches!(n, Node::Directory(d) if d.name == new.name)));
        if !duplicate {
            dir.contents.push(node);
        }
        return;
    };

    let position = dir
        .contents
        .iter()
        .position(|n| matches!(n, Node::Directory(d) if &d.name == first));
    let idx = match position {
        Some(idx) => idx,
        None => {
            dir.contents.push(Node::Directory(DirectoryNode {
                name: first.clone(),
                path: dir.path.join(first),
                contents: Vec::new(),
            }));
            dir.contents.len() - 1
        }
    };

    if let Node::Directory(child) = &mut dir.contents[idx] {
        insert_node(child, rest, node);
    }
}

/// Directories first, then files, each sorted by name
fn sort_tree(dir: &mut DirectoryNode) {
    dir.contents.sort_by(|a, b| {
        let a_dir = matches!(a, Node::Directory(_));
        let b_dir = matches!(b, Node::Directory(_));
        b_dir.cmp(&a_dir).then_with(|| a.name().cmp(b.name()))
    });
    for node in &mut dir.contents {
        if let Node::Directory(child) = node {
            sort_tree(child);
        }
    }
}
