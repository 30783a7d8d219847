//! OpenAI tokenizer implementation using tiktoken

use tiktoken_rs::CoreBPE;

use crate::tokenizer::error::{TokenizerError, TokenizerResult};
use crate::tokenizer::model::Model;
use crate::tokenizer::Tokenizer;

/// BPE tokenizer for an OpenAI model
pub struct OpenAIProvider {
    model: Model,
    encoding: CoreBPE,
}

impl OpenAIProvider {
    /// Load the encoding for `model`
    pub fn new(model: Model) -> TokenizerResult<Self> {
        let encoding = tiktoken_rs::get_bpe_from_model(model.model_id())
            .map_err(|e| TokenizerError::UnsupportedModel(format!("{}: {}", model.model_id(), e)))?;

        Ok(Self { model, encoding })
    }
}

impl Tokenizer for OpenAIProvider {
    fn count_tokens(&self, text: &str) -> TokenizerResult<usize> {
        Ok(self.encoding.encode_ordinary(text).len())
    }

    fn name(&self) -> String {
        self.model.model_id().to_string()
    }

    fn model_context_window(&self) -> Option<usize> {
        Some(self.model.context_window())
    }
}
