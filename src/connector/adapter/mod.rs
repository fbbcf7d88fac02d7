mod mock_language_model;
mod openai_completion_client;

pub use mock_language_model::*;
pub use openai_completion_client::*;
