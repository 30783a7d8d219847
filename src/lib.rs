/*!
 * ctxdump - Render textual snapshots of source directories for LLM context
 *
 * Each input root is rendered as a Markdown-like report: its location, git
 * metadata, directory structure, file contents and line statistics. Count
 * tree modes replace the report with per-file token or line totals
 * aggregated up the directory hierarchy.
 */

pub mod config;
pub mod error;
pub mod filter;
pub mod git;
pub mod renderer;
pub mod report;
pub mod scanner;
pub mod tokenizer;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use config::Config;
pub use error::{CtxDumpError, Result};
pub use filter::{FilterCriteria, FilterManager, Matcher};
pub use git::GitInfo;
pub use renderer::{RenderSummary, Renderer, RootSummary};
pub use report::{ReportFormat, Reporter, ScanReport};
pub use scanner::Scanner;
pub use tree::{build_tree, MetricEntries, TreeAggregator, TreeNode};
pub use types::{DirectoryNode, FileNode, FileType, Node, ScannedFile};
pub use utils::{count_lines, format_file_size};
pub use writer::OutputSink;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
