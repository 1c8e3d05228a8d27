pub mod openai_generator;

pub use crate::openai_generator::{ENV_API_KEY, ENV_BASE_URL, ENV_MODEL, OpenAiGenerator};
