use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invocation error: {0}")]
    Invocation(String),

    #[error("Construction error: {0}")]
    Construction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn invocation(msg: impl Into<String>) -> Self {
        Self::Invocation(msg.into())
    }

    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Turn-level failures leave the session running; everything else ends it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Invocation(_))
    }
}
