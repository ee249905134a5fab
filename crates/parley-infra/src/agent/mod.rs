//! Agent runtime implementations.

pub mod openai;

pub use openai::OpenAiCompatibleRuntime;
