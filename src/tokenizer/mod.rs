//! Tokenizer module for token counting
//!
//! Counts tokens with an OpenAI BPE encoding when a model is selected, and
//! falls back to a character estimate otherwise.

mod error;
mod model;
mod provider;

// Re-exports for public API
pub use error::{TokenizerError, TokenizerResult};
pub use model::Model;
pub use provider::estimate::EstimateProvider;
pub use provider::openai::OpenAIProvider;

use std::fs;
use std::path::Path;

/// Trait defining the interface for tokenizers
pub trait Tokenizer: Send + Sync {
    /// Count tokens in the given text
    fn count_tokens(&self, text: &str) -> TokenizerResult<usize>;

    /// Short name used in reports
    fn name(&self) -> String;

    /// Context window of the underlying model, when known
    fn model_context_window(&self) -> Option<usize> {
        None
    }
}

/// Create a tokenizer for the specified model, or the estimator for `None`
pub fn create_tokenizer(model: Option<Model>) -> TokenizerResult<Box<dyn Tokenizer>> {
    match model {
        Some(model) => Ok(Box::new(OpenAIProvider::new(model)?)),
        None => Ok(Box::new(EstimateProvider)),
    }
}

/// Count the tokens of a file, decoding invalid UTF-8 lossily
pub fn count_file_tokens(tokenizer: &dyn Tokenizer, path: &Path) -> TokenizerResult<usize> {
    let bytes = fs::read(path)?;
    tokenizer.count_tokens(&String::from_utf8_lossy(&bytes))
}
