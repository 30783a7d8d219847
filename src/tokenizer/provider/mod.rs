//! Provider implementations for different tokenizer backends

pub mod estimate;
pub mod openai;
