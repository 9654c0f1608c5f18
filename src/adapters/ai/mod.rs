//! Reply generator adapters.
//!
//! - `OpenAIResponsesGenerator` - production generator over the OpenAI Responses API
//! - `MockReplyGenerator` - scripted generator for tests and local runs

mod mock_generator;
mod openai_responses;

pub use mock_generator::{GenerationCall, MockReplyGenerator, DEFAULT_MOCK_REPLY};
pub use openai_responses::{
    OpenAIResponsesConfig, OpenAIResponsesGenerator, DEFAULT_INSTRUCTIONS,
    DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
};
