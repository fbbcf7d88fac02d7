pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatChain, ChatSession, ConnectionProbe, LanguageModelClient, SelfTestHarness, SessionEnd,
    UserInput, EXIT_KEYWORD, PROBE_PROMPT,
};

pub use connector::{
    FailingLanguageModel, MockLanguageModel, OpenAiCompletionClient, MOCK_RESPONSE_PREFIX,
};

pub use domain::{ChatError, ChatbotConfig, PromptTemplate, DEFAULT_TEMPLATE, INPUT_SLOT};
