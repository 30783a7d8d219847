/*!
 * Report rendering for one or more input roots
 *
 * Every section writes straight into the caller's writer. A root that cannot
 * be rendered is reported and skipped; only an output file that cannot be
 * opened aborts the whole run.
 */

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::{CtxDumpError, Result};
use crate::filter::extension_of;
use crate::git;
use crate::scanner::Scanner;
use crate::tokenizer::{count_file_tokens, create_tokenizer, Tokenizer};
use crate::tree::{MetricEntries, TreeAggregator};
use crate::types::{DirectoryNode, FileType, Node};
use crate::utils::{count_lines, format_file_size, is_text_file, language_for_extension, MAX_CONTENT_SIZE};
use crate::writer::OutputSink;

/// Totals gathered for one rendered root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootSummary {
    /// Absolute path of the root
    pub root: PathBuf,
    /// Number of admitted files
    pub files: u64,
    /// Total lines, when lines were counted
    pub lines: Option<u64>,
    /// Total tokens, when tokens were counted
    pub tokens: Option<u64>,
}

/// Outcome of a render run
#[derive(Debug, Clone, Default)]
pub struct RenderSummary {
    /// Roots that were rendered
    pub roots: Vec<RootSummary>,
    /// Roots skipped because they could not be rendered
    pub failed_roots: Vec<PathBuf>,
}

impl RenderSummary {
    pub fn total_files(&self) -> u64 {
        self.roots.iter().map(|r| r.files).sum()
    }

    pub fn total_lines(&self) -> u64 {
        self.roots.iter().filter_map(|r| r.lines).sum()
    }

    pub fn total_tokens(&self) -> Option<u64> {
        self.roots
            .iter()
            .filter_map(|r| r.tokens)
            .reduce(|a, b| a + b)
    }
}

/// Statistics section totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStatistics {
    pub files: u64,
    pub lines: u64,
}

/// Renders reports for the configured input roots
pub struct Renderer {
    /// Render configuration
    config: Config,
    /// Walks roots and admits files
    scanner: Scanner,
    /// Token counter for the token count tree
    tokenizer: Box<dyn Tokenizer>,
    /// Progress bar
    progress: Arc<ProgressBar>,
}

impl Renderer {
    /// Create a renderer; loads the model's tokenizer when a token tree is requested
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Result<Self> {
        let model = if config.token_count_tree { config.model } else { None };
        let tokenizer = create_tokenizer(model)?;

        Ok(Self {
            scanner: Scanner::new(&config),
            config,
            tokenizer,
            progress,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn tokenizer_name(&self) -> String {
        self.tokenizer.name()
    }

    /// Open the configured sink and render every root into it
    pub fn render_to_sink(&self) -> Result<RenderSummary> {
        let mut sink = OutputSink::open(self.config.output_file.as_deref())?;
        debug!("Writing report to {}", sink.describe());

        let summary = self.render(&mut sink)?;
        sink.flush()?;
        Ok(summary)
    }

    /// Render every root into `out`
    ///
    /// Missing roots and roots whose sections fail are logged and skipped.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<RenderSummary> {
        let mut summary = RenderSummary::default();

        for input in &self.config.inputs {
            let root = match std::path::absolute(input) {
                Ok(root) => root,
                Err(e) => {
                    error!("Error: cannot resolve {}: {}", input.display(), e);
                    summary.failed_roots.push(input.clone());
                    continue;
                }
            };

            match self.render_root(out, &root) {
                Ok(root_summary) => summary.roots.push(root_summary),
                Err(e @ CtxDumpError::PathNotFound(_)) => {
                    error!("Error: {}", e);
                    summary.failed_roots.push(root);
                }
                Err(e) => {
                    error!("Error rendering {}: {}", root.display(), e);
                    summary.failed_roots.push(root);
                }
            }
        }

        Ok(summary)
    }

    /// Render one absolute root; a missing root is [`CtxDumpError::PathNotFound`]
    fn render_root<W: Write>(&self, out: &mut W, root: &Path) -> Result<RootSummary> {
        debug!("Rendering {}", root.display());
        let mut summary = RootSummary {
            root: root.to_path_buf(),
            ..RootSummary::default()
        };

        if self.config.tree_mode() {
            ensure_exists(root)?;
            let mut files = 0;
            if self.config.token_count_tree {
                let (counted, tokens) = self.write_token_count_tree(out, root)?;
                files = counted;
                summary.tokens = Some(tokens);
            }
            if self.config.line_count_tree {
                let (counted, lines) = self.write_line_count_tree(out, root)?;
                files = counted;
                summary.lines = Some(lines);
            }
            summary.files = files;
            return Ok(summary);
        }

        self.write_location(out, root)?;
        ensure_exists(root)?;

        self.write_git_info(out, root)?;
        self.write_file_structure(out, root)?;
        if !self.config.dirs_only {
            self.write_file_contents(out, root)?;
        }
        let stats = self.write_file_statistics(out, root)?;
        writeln!(out)?;

        summary.files = stats.files;
        summary.lines = Some(stats.lines);
        Ok(summary)
    }

    /// `## File System Location` section
    pub fn write_location<W: Write>(&self, out: &mut W, root: &Path) -> io::Result<()> {
        write!(out, "## File System Location\n\n{}\n\n", root.display())
    }

    /// `### GIT INFO` section
    pub fn write_git_info<W: Write>(&self, out: &mut W, root: &Path) -> io::Result<()> {
        let info = git::lookup(root);
        write!(out, "### GIT INFO\n\n{}\n", info)
    }

    /// `### Structure` section
    pub fn write_file_structure<W: Write>(&self, out: &mut W, root: &Path) -> io::Result<()> {
        writeln!(out, "### Structure\n")?;

        let tree = self.scanner.structure(root);
        if root.is_file() {
            for node in &tree.contents {
                writeln!(out, "{}", node_label(node))?;
            }
        } else {
            writeln!(out, "{}/", tree.name)?;
            write_structure_children(out, &tree, "")?;
        }
        writeln!(out)
    }

    /// `### File Contents` section with one fenced block per admitted file
    pub fn write_file_contents<W: Write>(&self, out: &mut W, root: &Path) -> io::Result<()> {
        writeln!(out, "### File Contents\n")?;

        for file in self.scanner.files(root) {
            self.tick(&file.relative);
            let relative = file.relative.to_string_lossy();
            writeln!(out, "#### {}\n", relative)?;

            match read_display_content(&file.path) {
                Ok(DisplayContent::Text(content)) => {
                    let fence = fence_for(&content);
                    let language = language_for_extension(extension_of(&relative));
                    writeln!(out, "{}{}", fence, language)?;
                    out.write_all(content.as_bytes())?;
                    if !content.is_empty() && !content.ends_with('\n') {
                        writeln!(out)?;
                    }
                    writeln!(out, "{}\n", fence)?;
                }
                Ok(DisplayContent::Omitted(reason)) => writeln!(out, "_{}_\n", reason)?,
                Err(e) => {
                    warn!("Failed to read {}: {}", file.path.display(), e);
                    writeln!(out, "_Failed to read file content: {}_\n", e)?;
                }
            }
        }
        Ok(())
    }

    /// `### Statistics` section over the admitted files
    pub fn write_file_statistics<W: Write>(&self, out: &mut W, root: &Path) -> io::Result<FileStatistics> {
        let mut stats = FileStatistics::default();

        for file in self.scanner.files(root) {
            self.tick(&file.relative);
            match count_lines(&file.path) {
                Ok(lines) => {
                    stats.files += 1;
                    stats.lines += lines;
                }
                Err(e) => warn!("Skipping {}: {}", file.path.display(), e),
            }
        }

        write!(
            out,
            "### Statistics\nTotal Files: {}\nTotal Lines: {}\n",
            stats.files, stats.lines
        )?;
        Ok(stats)
    }

    /// Token count tree; returns the admitted file count and their token total
    pub fn write_token_count_tree<W: Write>(&self, out: &mut W, root: &Path) -> io::Result<(u64, u64)> {
        self.write_count_tree(out, root, "Token Count Tree", "tokens", |path| {
            count_file_tokens(self.tokenizer.as_ref(), path)
                .map(|tokens| tokens as u64)
                .map_err(|e| e.to_string())
        })
    }

    /// Line count tree; returns the admitted file count and their line total
    pub fn write_line_count_tree<W: Write>(&self, out: &mut W, root: &Path) -> io::Result<(u64, u64)> {
        self.write_count_tree(out, root, "Line Count Tree", "lines", |path| {
            count_lines(path).map_err(|e| e.to_string())
        })
    }

    fn write_count_tree<W, F>(
        &self,
        out: &mut W,
        root: &Path,
        title: &str,
        unit: &str,
        metric: F,
    ) -> io::Result<(u64, u64)>
    where
        W: Write,
        F: Fn(&Path) -> std::result::Result<u64, String>,
    {
        writeln!(out, "{}:", title)?;
        if self.config.threshold > 0 {
            writeln!(out, "Showing files with {}+ {}:", self.config.threshold, unit)?;
        }

        let mut entries = MetricEntries::new();
        let mut total = 0;
        for file in self.scanner.files(root) {
            self.tick(&file.relative);
            match metric(&file.path) {
                Ok(value) => {
                    total += value;
                    entries.insert(file.relative, value);
                }
                Err(e) => warn!("Skipping {}: {}", file.path.display(), e),
            }
        }
        let files = entries.len() as u64;

        let tree = TreeAggregator::new(self.config.threshold).build(entries);
        let label = root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());
        tree.render(out, &label, unit)?;
        writeln!(out)?;

        Ok((files, total))
    }

    fn tick(&self, relative: &Path) {
        self.progress.inc(1);
        let name = relative.to_string_lossy();
        // keep the message short enough for one terminal line
        let len = name.chars().count();
        let display_name = if len > 40 {
            format!("...{}", name.chars().skip(len - 37).collect::<String>())
        } else {
            name.to_string()
        };
        self.progress.set_message(format!("Current file: {}", display_name));
    }
}

fn ensure_exists(root: &Path) -> Result<()> {
    if root.exists() {
        Ok(())
    } else {
        Err(CtxDumpError::PathNotFound(root.display().to_string()))
    }
}

enum DisplayContent {
    Text(String),
    Omitted(String),
}

fn read_display_content(path: &Path) -> io::Result<DisplayContent> {
    let size = fs::metadata(path)?.len();
    if size > MAX_CONTENT_SIZE {
        return Ok(DisplayContent::Omitted(format!(
            "File too large to include content. Size: {}",
            format_file_size(size)
        )));
    }
    if !is_text_file(path)? {
        return Ok(DisplayContent::Omitted(format!(
            "Binary file omitted. Size: {}",
            format_file_size(size)
        )));
    }

    let bytes = fs::read(path)?;
    Ok(DisplayContent::Text(String::from_utf8_lossy(&bytes).into_owned()))
}

/// A backtick fence longer than any run of backticks inside `content`
fn fence_for(content: &str) -> String {
    let mut longest = 0;
    let mut current = 0;
    for c in content.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn node_label(node: &Node) -> String {
    match node {
        Node::Directory(dir) => format!("{}/", dir.name),
        Node::File(file) => match file.file_type {
            FileType::Regular => format!("{} ({})", file.name, format_file_size(file.size)),
            FileType::Symlink => format!("{} (symlink)", file.name),
            FileType::Directory | FileType::Other => file.name.clone(),
        },
    }
}

fn write_structure_children<W: Write>(out: &mut W, dir: &DirectoryNode, prefix: &str) -> io::Result<()> {
    let total = dir.contents.len();
    for (idx, node) in dir.contents.iter().enumerate() {
        let is_last = idx + 1 == total;
        let connector = if is_last { "└── " } else { "├── " };
        writeln!(out, "{}{}{}", prefix, connector, node_label(node))?;

        if let Node::Directory(child) = node {
            let extension = if is_last { "    " } else { "│   " };
            write_structure_children(out, child, &format!("{}{}", prefix, extension))?;
        }
    }
    Ok(())
}
