/*!
 * Output sink selection for ctxdump
 */

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};

use crate::error::{CtxDumpError, Result};

/// Destination of a rendered report: stdout or a file
pub enum OutputSink {
    /// Standard output
    Console(BufWriter<Stdout>),
    /// Report file
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
}

impl OutputSink {
    /// Open the sink; `None` selects stdout
    ///
    /// Failing to create the file is fatal for the whole run.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::Console(BufWriter::new(io::stdout()))),
            Some(path) => {
                let file = File::create(path).map_err(|source| CtxDumpError::OutputSink {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(Self::File {
                    path: path.to_path_buf(),
                    writer: BufWriter::new(file),
                })
            }
        }
    }

    /// Human-readable name of the destination
    pub fn describe(&self) -> String {
        match self {
            Self::Console(_) => "<stdout>".to_string(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn is_console(&self) -> bool {
        matches!(self, Self::Console(_))
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Console(writer) => writer.write(buf),
            Self::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Console(writer) => writer.flush(),
            Self::File { writer, .. } => writer.flush(),
        }
    }
}
