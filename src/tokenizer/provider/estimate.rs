//! Character-based token estimate used when no model is selected

use crate::tokenizer::error::TokenizerResult;
use crate::tokenizer::Tokenizer;

/// Characters per estimated token
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimates tokens as Unicode scalar count / 4
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateProvider;

impl Tokenizer for EstimateProvider {
    fn count_tokens(&self, text: &str) -> TokenizerResult<usize> {
        Ok(text.chars().count() / CHARS_PER_TOKEN)
    }

    fn name(&self) -> String {
        "estimate".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_chars_not_bytes() {
        let provider = EstimateProvider;
        assert_eq!(provider.count_tokens("").unwrap(), 0);
        assert_eq!(provider.count_tokens("abcdefgh").unwrap(), 2);
        // four multi-byte characters are still one token
        assert_eq!(provider.count_tokens("日本語字").unwrap(), 1);
    }
}
