/*!
 * Configuration handling for ctxdump
 */

use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;

use crate::error::Result;
use crate::filter::{is_extension_list, wildcard_count, FilterCriteria};
use crate::tokenizer::Model;
use crate::{bail, ensure};

/// Command-line arguments for ctxdump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "ctxdump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Render a textual snapshot of source directories for LLM context",
    long_about = "Writes the location, git metadata, structure, file contents and line statistics of each input path, or an aggregated token/line count tree."
)]
pub struct Args {
    /// Files or directories to render
    #[clap(default_value = ".")]
    pub inputs: Vec<String>,

    /// Write the report to this file instead of stdout
    #[clap(short, long)]
    pub output: Option<String>,

    /// Only include files matching this pattern (`*.rs`, `src/*`, `test`)
    #[clap(short, long)]
    pub include: Option<String>,

    /// Exclude files matching this pattern or extension list (`*.o, *.a`)
    #[clap(short, long)]
    pub exclude: Option<String>,

    /// Show the structure and statistics without file contents
    #[clap(short, long)]
    pub dirs_only: bool,

    /// Print a tree of token counts instead of the full report
    #[clap(long)]
    pub token_count_tree: bool,

    /// Print a tree of line counts instead of the full report
    #[clap(long)]
    pub line_count_tree: bool,

    /// Hide files whose count is below this value in count trees
    #[clap(long, default_value = "0")]
    pub threshold: u64,

    /// Model whose tokenizer counts tokens (default: chars / 4 estimate)
    #[clap(long, value_enum)]
    pub model: Option<Model>,

    /// Skip files ignored by .gitignore
    #[clap(long)]
    pub respect_gitignore: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[clap(short, long)]
    pub verbose: bool,
}

/// Application configuration
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Input roots, each rendered independently
    pub inputs: Vec<PathBuf>,

    /// Output file path (stdout when `None`)
    pub output_file: Option<PathBuf>,

    /// Include/exclude criteria for files
    pub filters: FilterCriteria,

    /// Skip the file contents section
    pub dirs_only: bool,

    /// Render the token count tree instead of the full report
    pub token_count_tree: bool,

    /// Render the line count tree instead of the full report
    pub line_count_tree: bool,

    /// Minimum count for a file to appear in count trees
    pub threshold: u64,

    /// Model used for token counting
    pub model: Option<Model>,

    /// Whether to respect .gitignore files
    pub respect_gitignore: bool,

    /// Debug logging
    pub verbose: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            inputs: args.inputs.into_iter().map(PathBuf::from).collect(),
            output_file: args.output.filter(|o| !o.is_empty()).map(PathBuf::from),
            filters: FilterCriteria::from_patterns(args.include, args.exclude),
            dirs_only: args.dirs_only,
            token_count_tree: args.token_count_tree,
            line_count_tree: args.line_count_tree,
            threshold: args.threshold,
            model: args.model,
            respect_gitignore: args.respect_gitignore,
            verbose: args.verbose,
        }
    }

    /// Configuration rendering `inputs` with every other option at its default
    pub fn for_inputs<I, P>(inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            inputs: inputs.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
            ..Self::default()
        }
    }

    /// Whether a count tree replaces the full report
    pub fn tree_mode(&self) -> bool {
        self.token_count_tree || self.line_count_tree
    }

    /// Validate the configuration
    ///
    /// Missing input roots are not an error here: each root is checked when it
    /// is rendered so the remaining roots still get processed.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.inputs.is_empty(), InvalidArgument, "no input paths given");

        // Check if output file directory exists
        if let Some(output) = &self.output_file {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    bail!(Config, "Output directory not found: {}", parent.display());
                }
            }
            ensure!(!output.is_dir(), Config, "Output path is a directory: {}", output.display());
        }

        if let Some(pattern) = &self.filters.include_pattern {
            validate_pattern("include", pattern)?;
        }
        if let Some(pattern) = &self.filters.exclude_pattern {
            if !is_extension_list(pattern) {
                validate_pattern("exclude", pattern)?;
            }
        }

        Ok(())
    }
}

/// Reject patterns the matcher would silently degrade to substring tests
fn validate_pattern(role: &str, pattern: &str) -> Result<()> {
    ensure!(
        wildcard_count(pattern) <= 1,
        Config,
        "{} pattern '{}' has more than one '*'; only a single wildcard is supported",
        role,
        pattern
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CtxDumpError;
    use tempfile::tempdir;

    #[test]
    fn test_from_args() {
        let args = Args::parse_from([
            "ctxdump",
            "src",
            "tests",
            "-o",
            "out.md",
            "-e",
            "*.o, *.a",
            "--token-count-tree",
            "--threshold",
            "50",
        ]);
        let config = Config::from_args(args);

        assert_eq!(config.inputs, vec![PathBuf::from("src"), PathBuf::from("tests")]);
        assert_eq!(config.output_file, Some(PathBuf::from("out.md")));
        assert_eq!(config.filters.exclude_pattern.as_deref(), Some("*.o, *.a"));
        assert!(config.filters.include_pattern.is_none());
        assert!(config.token_count_tree && config.tree_mode());
        assert_eq!(config.threshold, 50);
    }

    #[test]
    fn test_default_input_is_current_dir() {
        let config = Config::from_args(Args::parse_from(["ctxdump"]));
        assert_eq!(config.inputs, vec![PathBuf::from(".")]);
        assert!(config.output_file.is_none());
        assert_eq!(config.threshold, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_multiple_wildcards() {
        let mut config = Config::for_inputs(["."]);
        config.filters = FilterCriteria::default().include("src/*/*.rs");
        assert!(matches!(config.validate(), Err(CtxDumpError::Config(_))));

        config.filters = FilterCriteria::default().exclude("*build*");
        assert!(matches!(config.validate(), Err(CtxDumpError::Config(_))));

        // extension lists carry one wildcard per token
        config.filters = FilterCriteria::default().exclude("*.o, *.a, *.lib");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_missing_output_directory() {
        let dir = tempdir().unwrap();
        let mut config = Config::for_inputs([dir.path()]);
        config.output_file = Some(dir.path().join("missing").join("out.md"));
        assert!(matches!(config.validate(), Err(CtxDumpError::Config(_))));

        config.output_file = Some(dir.path().join("out.md"));
        assert!(config.validate().is_ok());
    }
}
