/*!
 * Utility functions for ctxdump
 */

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Files larger than this are listed but their content is not included
pub const MAX_CONTENT_SIZE: u64 = 1_048_576;

/// Count the lines of a file
///
/// Every `\n` ends a line; trailing bytes without a final newline count as one
/// more line. An empty file has zero lines.
pub fn count_lines(path: &Path) -> io::Result<u64> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut lines = 0;
    let mut last_byte = None;

    loop {
        let buffer = reader.fill_buf()?;
        if buffer.is_empty() {
            break;
        }
        lines += buffer.iter().filter(|&&b| b == b'\n').count() as u64;
        last_byte = buffer.last().copied();
        let consumed = buffer.len();
        reader.consume(consumed);
    }

    if matches!(last_byte, Some(b) if b != b'\n') {
        lines += 1;
    }

    Ok(lines)
}

/// Heuristic text detection on the first 8 KiB of a file
///
/// Valid UTF-8 with fewer than 10% control bytes counts as text. Empty files
/// are text.
pub fn is_text_file(path: &Path) -> io::Result<bool> {
    let mut buffer = Vec::with_capacity(8192);
    File::open(path)?.take(8192).read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        return Ok(true);
    }

    // a multi-byte character may be cut at the sample boundary
    let valid = match std::str::from_utf8(&buffer) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && buffer.len() == 8192,
    };
    if !valid {
        return Ok(false);
    }

    let binary_count = buffer
        .iter()
        .filter(|&&b| (b < 9) || (b > 13 && b < 32))
        .count();
    Ok((binary_count as f32 / buffer.len() as f32) < 0.1)
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Code fence language for an extension such as `.rs` (dot included)
pub fn language_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        ".c" | ".cc" | ".cpp" | ".cxx" | ".h" | ".hh" | ".hpp" | ".hxx" => "cpp",
        ".rs" => "rust",
        ".py" => "python",
        ".js" | ".mjs" | ".cjs" => "javascript",
        ".ts" | ".tsx" => "typescript",
        ".jsx" => "jsx",
        ".go" => "go",
        ".java" => "java",
        ".kt" | ".kts" => "kotlin",
        ".cs" => "csharp",
        ".rb" => "ruby",
        ".php" => "php",
        ".swift" => "swift",
        ".sh" | ".bash" | ".zsh" => "bash",
        ".md" | ".markdown" => "markdown",
        ".json" => "json",
        ".toml" => "toml",
        ".yaml" | ".yml" => "yaml",
        ".xml" => "xml",
        ".html" | ".htm" => "html",
        ".css" => "css",
        ".sql" => "sql",
        ".cmake" => "cmake",
        _ => "text",
    }
}
