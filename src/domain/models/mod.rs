mod config;
mod prompt;

pub use config::*;
pub use prompt::*;
