//! Text-generation boundary for the counsellor.
//!
//! [`TextGenerator`] is the single seam to the external model:
//! `generate(prompt) -> text`. [`GeminiClient`] implements it over the
//! Gemini REST API, and [`Counsellor`] composes prompt building, the
//! call and reply parsing, falling back to canned replies on any failure.

pub mod config;
pub mod counsellor;
pub mod error;
pub mod gemini;
pub mod generator;

pub use config::LlmConfig;
pub use counsellor::Counsellor;
pub use error::GenerationError;
pub use gemini::GeminiClient;
pub use generator::TextGenerator;
