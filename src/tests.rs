/*!
 * Tests for ctxdump report rendering
 */

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tempfile::tempdir;

use crate::config::Config;
use crate::filter::FilterCriteria;
use crate::renderer::{RenderSummary, Renderer};

// Helper function to create a test directory structure
fn setup_test_directory() -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;

    fs::create_dir(temp_dir.path().join("dir1"))?;
    fs::create_dir(temp_dir.path().join("dir1").join("subdir"))?;

    let mut file1 = File::create(temp_dir.path().join("file1.txt"))?;
    writeln!(file1, "This is a text file with content")?;

    let mut file2 = File::create(temp_dir.path().join("dir1").join("file2.cpp"))?;
    writeln!(file2, "int main() {{\n    return 0;\n}}")?;

    let mut file3 = File::create(temp_dir.path().join("dir1").join("subdir").join("file3.h"))?;
    writeln!(file3, "#pragma once")?;

    fs::create_dir(temp_dir.path().join(".git"))?;
    let mut git_file = File::create(temp_dir.path().join(".git").join("config"))?;
    writeln!(git_file, "[core]\n\trepositoryformatversion = 0")?;

    let mut bin_file = File::create(temp_dir.path().join("binary.bin"))?;
    bin_file.write_all(&[0u8, 1u8, 2u8, 3u8])?;

    Ok(temp_dir)
}

fn render(config: Config) -> (String, RenderSummary) {
    let renderer = Renderer::new(config, Arc::new(ProgressBar::hidden())).unwrap();
    let mut out = Vec::new();
    let summary = renderer.render(&mut out).unwrap();
    (String::from_utf8(out).unwrap(), summary)
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("missing {:?} in:\n{}", needle, haystack))
}

#[test]
fn test_full_report_sections_in_order() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let (output, summary) = render(Config::for_inputs([temp_dir.path()]));

    let location = position(&output, "## File System Location\n\n");
    let git = position(&output, "### GIT INFO\n\n");
    let structure = position(&output, "### Structure\n\n");
    let contents = position(&output, "### File Contents\n\n");
    let statistics = position(&output, "### Statistics\n");
    assert!(location < git && git < structure && structure < contents && contents < statistics);

    let root = std::path::absolute(temp_dir.path())?;
    assert!(output.contains(&format!("{}\n", root.display())));
    assert!(output.contains("├── dir1/\n"));
    assert!(output.contains("#### dir1/file2.cpp\n\n```cpp\n"));
    assert!(output.contains("#### dir1/subdir/file3.h\n\n```cpp\n#pragma once\n```"));
    assert!(output.contains("_Binary file omitted. Size: 4 bytes_"));
    assert!(!output.contains("repositoryformatversion"));
    assert!(output.contains("Total Files: 4\nTotal Lines: 6\n"));

    assert_eq!(summary.roots.len(), 1);
    assert_eq!(summary.total_files(), 4);
    assert!(summary.failed_roots.is_empty());
    Ok(())
}

#[test]
fn test_dirs_only_skips_contents() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let mut config = Config::for_inputs([temp_dir.path()]);
    config.dirs_only = true;

    let (output, _) = render(config);
    assert!(output.contains("### Structure"));
    assert!(!output.contains("### File Contents"));
    assert!(!output.contains("This is a text file"));
    assert!(output.contains("### Statistics"));
    Ok(())
}

#[test]
fn test_missing_root_does_not_stop_the_run() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let missing = temp_dir.path().join("does-not-exist");
    let (output, summary) = render(Config::for_inputs([missing.as_path(), temp_dir.path()]));

    // location is still written for the missing root
    assert_eq!(output.matches("## File System Location").count(), 2);
    assert_eq!(output.matches("### Statistics").count(), 1);
    assert_eq!(summary.failed_roots, vec![std::path::absolute(&missing)?]);
    assert_eq!(summary.roots.len(), 1);
    Ok(())
}

#[test]
fn test_statistics_for_multiple_files() -> io::Result<()> {
    let temp_dir = tempdir()?;
    for (name, lines) in [("file1.txt", 1000), ("file2.txt", 2000), ("file3.txt", 3000)] {
        let mut file = File::create(temp_dir.path().join(name))?;
        for i in 0..lines {
            writeln!(file, "Line: {}", i)?;
        }
    }

    let mut config = Config::for_inputs([temp_dir.path()]);
    config.dirs_only = true;
    let (output, summary) = render(config);

    assert!(output.contains("Total Files: 3"));
    assert!(output.contains("Total Lines: 6000"));
    assert_eq!(summary.total_lines(), 6000);
    Ok(())
}

#[test]
fn test_include_and_exclude_filters() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;

    let mut config = Config::for_inputs([temp_dir.path()]);
    config.filters = FilterCriteria::default().exclude("*.cpp, *.bin");
    let (output, summary) = render(config);
    assert!(!output.contains("#### dir1/file2.cpp"));
    assert!(!output.contains("#### binary.bin"));
    assert!(output.contains("#### file1.txt"));
    assert_eq!(summary.total_files(), 2);

    let mut config = Config::for_inputs([temp_dir.path()]);
    config.filters = FilterCriteria::default().include("dir1/*");
    let (output, summary) = render(config);
    assert!(output.contains("#### dir1/file2.cpp"));
    assert!(output.contains("#### dir1/subdir/file3.h"));
    assert!(!output.contains("#### file1.txt"));
    // the structure section is unfiltered
    assert!(output.contains("file1.txt ("));
    assert_eq!(summary.total_files(), 2);

    let mut config = Config::for_inputs([temp_dir.path()]);
    config.filters = FilterCriteria::default().exclude_when(|path: &Path| path.starts_with("dir1"));
    let (_, summary) = render(config);
    assert_eq!(summary.total_files(), 2);
    Ok(())
}

#[test]
fn test_single_file_root() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let file = temp_dir.path().join("file1.txt");
    let (output, summary) = render(Config::for_inputs([&file]));

    assert!(output.contains("### Structure\n\nfile1.txt (33 bytes)\n"));
    assert!(output.contains("#### file1.txt\n\n```text\nThis is a text file with content\n```"));
    assert!(output.contains("Total Files: 1\nTotal Lines: 1\n"));
    assert_eq!(summary.total_files(), 1);
    Ok(())
}

#[test]
fn test_token_count_tree_replaces_report() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::create_dir(temp_dir.path().join("src"))?;
    fs::write(temp_dir.path().join("src/big.rs"), "a".repeat(800))?;
    fs::write(temp_dir.path().join("src/small.rs"), "a".repeat(40))?;
    fs::write(temp_dir.path().join("README.md"), "a".repeat(400))?;

    let mut config = Config::for_inputs([temp_dir.path()]);
    config.token_count_tree = true;
    config.threshold = 50;
    let (output, summary) = render(config);

    let name = temp_dir.path().file_name().unwrap().to_string_lossy().to_string();
    let expected = format!(
        "Token Count Tree:\nShowing files with 50+ tokens:\n{} (300 tokens)\n├── README.md (100 tokens)\n└── src/ (200 tokens)\n    └── big.rs (200 tokens)\n\n",
        name
    );
    assert_eq!(output, expected);
    assert!(!output.contains("## File System Location"));

    assert_eq!(summary.roots[0].files, 3);
    assert_eq!(summary.total_tokens(), Some(310));
    Ok(())
}

#[test]
fn test_output_file_inside_root_is_not_rendered() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let output_file = temp_dir.path().join("report.md");
    let mut config = Config::for_inputs([temp_dir.path()]);
    config.output_file = Some(output_file.clone());

    let renderer = Renderer::new(config, Arc::new(ProgressBar::hidden())).unwrap();
    let summary = renderer.render_to_sink().unwrap();
    let output = fs::read_to_string(&output_file)?;

    assert!(!output.contains("#### report.md"));
    assert!(output.contains("Total Files: 4"));
    assert_eq!(summary.total_files(), 4);
    Ok(())
}

#[test]
fn test_git_info_for_repository() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let repo = git2::Repository::init(temp_dir.path()).unwrap();
    fs::write(temp_dir.path().join("main.rs"), "fn main() {}\n")?;

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("main.rs")).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = git2::Signature::now("TestUser", "test@gmail.com").unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
        .unwrap();

    let (output, _) = render(Config::for_inputs([temp_dir.path()]));
    assert!(output.contains("### GIT INFO\n\n- Commit: "));
    assert!(output.contains("- Author: TestUser <test@gmail.com>\n"));
    assert!(!output.contains("Not a git repository"));
    Ok(())
}
