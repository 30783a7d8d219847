/*!
 * Aggregation of per-file metrics into a directory tree
 *
 * Leaves hold a file's metric, every directory holds the sum of its
 * children. The tree is rebuilt for each render and never cached.
 */

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tracing::warn;

/// Per-file metrics keyed by path relative to the scanned root
pub type MetricEntries = BTreeMap<PathBuf, u64>;

/// A node of the aggregated tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    /// Path segment (empty for the root)
    pub name: String,
    /// Whether this node is a file
    pub is_leaf: bool,
    /// Own metric for leaves, sum of children otherwise
    pub aggregated_value: u64,
    /// Children keyed by segment name
    pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn directory(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn leaf(name: &str, value: u64) -> Self {
        Self {
            name: name.to_string(),
            is_leaf: true,
            aggregated_value: value,
            children: BTreeMap::new(),
        }
    }

    /// Look up a descendant by its path relative to this node
    pub fn find(&self, path: impl AsRef<Path>) -> Option<&TreeNode> {
        segments(path.as_ref())?
            .iter()
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    /// Number of leaves under this node
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf {
            1
        } else {
            self.children.values().map(TreeNode::leaf_count).sum()
        }
    }

    /// Write the tree depth-first, children sorted by name
    ///
    /// The root line carries `root_label`; every line ends with the node's
    /// aggregated value followed by `unit`.
    pub fn render<W: Write>(&self, out: &mut W, root_label: &str, unit: &str) -> io::Result<()> {
        writeln!(out, "{} ({} {})", root_label, self.aggregated_value, unit)?;
        self.render_children(out, "", unit)
    }

    fn render_children<W: Write>(&self, out: &mut W, prefix: &str, unit: &str) -> io::Result<()> {
        let total = self.children.len();
        for (idx, child) in self.children.values().enumerate() {
            let is_last = idx + 1 == total;
            let connector = if is_last { "└── " } else { "├── " };
            let slash = if child.is_leaf { "" } else { "/" };
            writeln!(
                out,
                "{}{}{}{} ({} {})",
                prefix, connector, child.name, slash, child.aggregated_value, unit
            )?;

            if !child.is_leaf {
                let extension = if is_last { "    " } else { "│   " };
                child.render_children(out, &format!("{}{}", prefix, extension), unit)?;
            }
        }
        Ok(())
    }

    /// Recompute directory totals bottom-up, returning this node's value
    fn recompute(&mut self) -> u64 {
        if !self.is_leaf {
            self.aggregated_value = self.children.values_mut().map(TreeNode::recompute).sum();
        }
        self.aggregated_value
    }
}

/// Builds [`TreeNode`] hierarchies from flat metric entries
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeAggregator {
    /// Minimum metric for a file to appear as a leaf
    pub threshold: u64,
}

impl TreeAggregator {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    /// Fold `entries` into a tree rooted at the scanned path
    ///
    /// Entries below the threshold are dropped before insertion, so directory
    /// totals only cover the files that remain visible. Entries with `.` or
    /// `..` components, or whose path collides with an existing file or
    /// directory, are skipped with a warning.
    pub fn build<I, P>(&self, entries: I) -> TreeNode
    where
        I: IntoIterator<Item = (P, u64)>,
        P: AsRef<Path>,
    {
        let mut root = TreeNode::directory("");

        for (path, value) in entries {
            if value < self.threshold {
                continue;
            }

            let path = path.as_ref();
            let Some(parts) = segments(path) else {
                warn!("Skipping metric entry with a non-normal component: {}", path.display());
                continue;
            };
            let Some((file_name, dirs)) = parts.split_last() else {
                warn!("Skipping metric entry without a file name: {}", path.display());
                continue;
            };
            if collides(&root, dirs, file_name) {
                warn!("Skipping metric entry colliding with an existing node: {}", path.display());
                continue;
            }

            let mut node = &mut root;
            for dir in dirs {
                node = node
                    .children
                    .entry(dir.clone())
                    .or_insert_with(|| TreeNode::directory(dir));
            }
            node.children
                .insert(file_name.clone(), TreeNode::leaf(file_name, value));
        }

        root.recompute();
        root
    }
}

/// Convenience wrapper around [`TreeAggregator::build`]
pub fn build_tree(entries: &MetricEntries, threshold: u64) -> TreeNode {
    TreeAggregator::new(threshold).build(entries.iter().map(|(path, value)| (path, *value)))
}

/// Normal components of `path`, or `None` if it has any other kind
fn segments(path: &Path) -> Option<Vec<String>> {
    path.components()
        .map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

/// Whether a leaf at `dirs/file_name` would pass through an existing leaf or
/// replace an existing directory
fn collides(root: &TreeNode, dirs: &[String], file_name: &str) -> bool {
    let mut node = root;
    for dir in dirs {
        match node.children.get(dir) {
            Some(child) if child.is_leaf => return true,
            Some(child) => node = child,
            None => return false,
        }
    }
    node.children.get(file_name).is_some_and(|child| !child.is_leaf)
}
