mod language_model_client;

pub use language_model_client::*;
