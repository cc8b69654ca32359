//! External text-generation collaborator.

pub mod gemini;

pub use gemini::GeminiClient;

use crate::constants::{
    GENERATION_MAX_OUTPUT_TOKENS, GENERATION_TEMPERATURE, GENERATION_TOP_K, GENERATION_TOP_P,
};
use crate::error::Result;

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: GENERATION_TEMPERATURE,
            max_output_tokens: GENERATION_MAX_OUTPUT_TOKENS,
            top_p: GENERATION_TOP_P,
            top_k: GENERATION_TOP_K,
        }
    }
}

/// Text-generation service used to translate prompts into SQL
///
/// Implementations must not retry; any failure is reported as
/// `TranslateError::CollaboratorFailure` and ends the translation.
/// Timeouts are the implementation's responsibility.
pub trait ModelClient: Send {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;
}

impl<T: ModelClient + ?Sized> ModelClient for Box<T> {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        (**self).generate(prompt, params)
    }
}
