mod chat_chain;
mod chat_session;
mod connection_probe;

pub use chat_chain::*;
pub use chat_session::*;
pub use connection_probe::*;
pub use self_test::*;
