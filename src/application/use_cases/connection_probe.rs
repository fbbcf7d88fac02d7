use std::io::Write;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::LanguageModelClient;
use crate::domain::ChatError;

/// Fixed diagnostic question ("What is your name?").
pub const PROBE_PROMPT: &str = "Qual é o seu nome?";

/// One-shot startup health check for a [`LanguageModelClient`].
///
/// Any non-failing reply counts as success; the reply's content is shown to
/// the user but never inspected. Failures are reported once and not retried.
pub struct ConnectionProbe {
    client: Arc<dyn LanguageModelClient>,
}

impl ConnectionProbe {
    pub fn new(client: Arc<dyn LanguageModelClient>) -> Self {
        Self { client }
    }

    /// Send [`PROBE_PROMPT`] and return the trimmed reply.
    pub async fn check(&self) -> Result<String, ChatError> {
        let reply = self.client.invoke(PROBE_PROMPT).await?;
        Ok(reply.trim().to_string())
    }

    /// Run the check, writing a human-readable report to `out`.
    ///
    /// Only errors writing the report are returned; a failed check is `Ok(false)`.
    pub async fn probe<W: Write>(&self, out: &mut W) -> std::io::Result<bool> {
        writeln!(out, "\n--- Testando conexão com o LLM ---")?;

        match self.check().await {
            Ok(reply) => {
                info!("Probe succeeded against {}", self.client.name());
                writeln!(out, "Resposta do LLM (teste): {reply}")?;
                writeln!(out, "Conexão com o LLM bem-sucedida! O LLM respondeu.")?;
                Ok(true)
            }
            Err(e) => {
                warn!("Probe failed against {}: {e}", self.client.name());
                writeln!(out, "Erro ao conectar ou interagir com o LLM: {e}")?;
                writeln!(
                    out,
                    "Certifique-se de que o LM Studio está rodando e o servidor está ativo na porta correta."
                )?;
                writeln!(
                    out,
                    "Verifique se o modelo está carregado e sendo servido em: {}",
                    self.client.name()
                )?;
                Ok(false)
            }
        }
    }
}
