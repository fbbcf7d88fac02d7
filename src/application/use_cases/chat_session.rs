use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::application::use_cases::{ChatChain, ConnectionProbe};
use crate::application::LanguageModelClient;
use crate::domain::{ChatError, DEFAULT_TEMPLATE};

/// Typing this word (any letter case) ends the session.
pub const EXIT_KEYWORD: &str = "sair";
pub const USER_LABEL: &str = "Você";
pub const BOT_LABEL: &str = "Bot";

/// How a session that got past its startup checks came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed [`EXIT_KEYWORD`].
    Exit,
    /// The input stream reached end-of-file.
    InputClosed,
}

/// What a single line of user input asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInput<'a> {
    Exit,
    Empty,
    Message(&'a str),
}

impl<'a> UserInput<'a> {
    /// Trimming only decides exit and empty lines; messages keep the line as typed.
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case(EXIT_KEYWORD) {
            Self::Exit
        } else if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Message(line)
        }
    }
}

/// Interactive read-eval-print loop over a single client.
///
/// The session keeps no history: every turn renders a fresh prompt from the
/// current line only.
pub struct ChatSession {
    client: Arc<dyn LanguageModelClient>,
    probe_client: Arc<dyn LanguageModelClient>,
    template: String,
}

impl ChatSession {
    pub fn new(client: Arc<dyn LanguageModelClient>) -> Self {
        Self {
            probe_client: client.clone(),
            client,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Probe with a differently configured handle to the same server
    /// (e.g. lower sampling temperature).
    pub fn with_probe_client(mut self, probe_client: Arc<dyn LanguageModelClient>) -> Self {
        self.probe_client = probe_client;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Probe, assemble the chain, then loop until the exit keyword or EOF.
    ///
    /// A failed probe returns [`ChatError::Connection`] and a malformed
    /// template [`ChatError::Construction`]; in both cases no input is read.
    /// Failed turns are reported on `out` and the loop carries on.
    pub async fn run<R, W>(&self, input: R, out: &mut W) -> Result<SessionEnd, ChatError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let probe = ConnectionProbe::new(self.probe_client.clone());
        if !probe.probe(out).await? {
            writeln!(
                out,
                "\nNão foi possível iniciar o chatbot devido a problemas de conexão com o LLM."
            )?;
            return Err(ChatError::connection(format!(
                "{} did not answer the startup probe",
                self.probe_client.name()
            )));
        }

        let chain = self.configure(out)?;

        writeln!(out, "\n--- Chatbot Iniciado! ---")?;
        writeln!(
            out,
            "Digite sua mensagem e pressione Enter. Digite '{EXIT_KEYWORD}' para encerrar."
        )?;

        let mut input = input;
        let mut buf = Vec::new();
        loop {
            write!(out, "\n{USER_LABEL}: ")?;
            out.flush()?;

            let Some(line) = read_line_lossy(&mut input, &mut buf).await? else {
                writeln!(out)?;
                info!("Input closed, ending session");
                return Ok(SessionEnd::InputClosed);
            };

            match UserInput::classify(&line) {
                UserInput::Exit => {
                    writeln!(out, "Encerrando o chatbot. Até mais!")?;
                    info!("Exit keyword received, ending session");
                    return Ok(SessionEnd::Exit);
                }
                UserInput::Empty => continue,
                UserInput::Message(text) => self.turn(&chain, text, out).await?,
            }
        }
    }

    fn configure<W: Write>(&self, out: &mut W) -> Result<ChatChain, ChatError> {
        writeln!(out, "\n--- Configurando Chatbot ---")?;

        match ChatChain::from_template(self.client.clone(), &self.template) {
            Ok(chain) => {
                writeln!(out, "Chatbot configurado com sucesso!")?;
                Ok(chain)
            }
            Err(e) => {
                warn!("Failed to assemble chat chain: {e}");
                writeln!(out, "Erro ao configurar o chatbot: {e}")?;
                Err(e)
            }
        }
    }

    async fn turn<W: Write>(
        &self,
        chain: &ChatChain,
        text: &str,
        out: &mut W,
    ) -> Result<(), ChatError> {
        match chain.respond(text).await {
            Ok(reply) => writeln!(out, "{BOT_LABEL}: {reply}")?,
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(e) => {
                warn!("Turn failed: {e}");
                writeln!(out, "Erro ao processar a requisição: {e}")?;
                writeln!(out, "Verifique se o servidor LM Studio ainda está ativo.")?;
            }
        }
        Ok(())
    }
}

/// Read one line without its terminator, replacing invalid UTF-8 instead of failing.
///
/// Returns `None` at end of input.
async fn read_line_lossy<R>(input: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if input.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}
