//! Tokenizer failures

use std::io;
use thiserror::Error;

pub type TokenizerResult<T> = Result<T, TokenizerError>;

#[derive(Error, Debug)]
pub enum TokenizerError {
    /// The BPE tables for the model could not be loaded
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// The file to count could not be read
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}
