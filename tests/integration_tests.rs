//! Integration tests for LMChat.
//!
//! These tests drive the public API end to end with fake models; no server is needed.

use std::sync::Arc;

use lmchat::{
    ChatChain, ChatError, ChatSession, ConnectionProbe, FailingLanguageModel, MockLanguageModel,
    PromptTemplate, SelfTestHarness, SessionEnd, DEFAULT_TEMPLATE, PROBE_PROMPT,
};

/// Run a session over a scripted stdin, returning the result and everything printed.
async fn run_script(session: &ChatSession, script: &str) -> (Result<SessionEnd, ChatError>, String) {
    let mut out = Vec::new();
    let result = session.run(script.as_bytes(), &mut out).await;
    (result, String::from_utf8(out).expect("Output should be UTF-8"))
}

#[tokio::test]
async fn test_probe_sends_diagnostic_question() {
    let client = Arc::new(MockLanguageModel::new());
    let ok = ConnectionProbe::new(client.clone())
        .probe(&mut Vec::new())
        .await
        .expect("Probe report should be written");

    assert!(ok);
    assert_eq!(client.invocations(), vec![PROBE_PROMPT.to_string()]);
}

#[tokio::test]
async fn test_mock_chain_wraps_rendered_template() {
    let client = Arc::new(MockLanguageModel::new());
    let chain = ChatChain::from_template(client, DEFAULT_TEMPLATE).expect("Failed to assemble chain");

    let reply = chain.respond("hello").await.expect("Mock never fails");

    let rest = reply
        .strip_prefix("Mock Response:")
        .expect("Reply should start with the mock tag");
    assert!(rest.contains("Pergunta: hello"));
    assert!(rest.trim_start().starts_with("Você é um chatbot"));
}

#[tokio::test]
async fn test_full_conversation() {
    let client = Arc::new(MockLanguageModel::new());
    let session = ChatSession::new(client.clone());

    let (result, out) = run_script(&session, "Oi!\n\nQual a capital do Brasil?\nSair\n").await;

    assert_eq!(result.expect("Session should end cleanly"), SessionEnd::Exit);
    let prompts = client.invocations();
    assert_eq!(prompts.len(), 3, "Probe plus two turns");
    assert_eq!(prompts[0], PROBE_PROMPT);
    assert_eq!(prompts[1], PromptTemplate::default().render("Oi!"));
    assert_eq!(prompts[2], PromptTemplate::default().render("Qual a capital do Brasil?"));
    assert_eq!(out.matches("Bot: Mock Response:").count(), 2);
}

#[tokio::test]
async fn test_unreachable_server_blocks_session() {
    let client = Arc::new(FailingLanguageModel::new("connection refused"));
    let session = ChatSession::new(client.clone());

    let (result, out) = run_script(&session, "hello\n").await;

    assert!(matches!(result, Err(ChatError::Connection(_))));
    assert_eq!(client.invocation_count(), 1, "Probe must not retry");
    assert!(!out.contains("Chatbot Iniciado"));
}

#[tokio::test]
async fn test_exit_keyword_in_any_case() {
    for keyword in ["sair", "SAIR", "Sair"] {
        let client = Arc::new(MockLanguageModel::new());
        let session = ChatSession::new(client.clone());

        let (result, _) = run_script(&session, &format!("{keyword}\n")).await;

        assert_eq!(result.expect("Session should end cleanly"), SessionEnd::Exit);
        assert_eq!(client.invocation_count(), 1, "{keyword} should not reach the model");
    }
}

#[tokio::test]
async fn test_self_test_outcomes() {
    let passing = SelfTestHarness::new(Arc::new(MockLanguageModel::new()));
    assert!(passing.run(&mut Vec::new()).await);

    let failing = SelfTestHarness::new(Arc::new(FailingLanguageModel::new("forced failure")));
    assert!(!failing.run(&mut Vec::new()).await);
}
