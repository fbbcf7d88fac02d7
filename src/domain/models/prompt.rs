use crate::domain::ChatError;

/// Placeholder replaced by the user's text when a template is rendered.
pub const INPUT_SLOT: &str = "{input}";

/// Instructional template establishing the "helpful assistant" persona.
pub const DEFAULT_TEMPLATE: &str = "Você é um chatbot útil e amigável, capaz de conversar sobre diversos tópicos.\n\nPergunta: {input}\nResposta:";

/// A prompt template with exactly one `{input}` slot.
///
/// The template is split around the slot once, at construction. Rendering
/// concatenates `prefix + input + suffix`, so the user's text is embedded
/// verbatim and never substituted a second time, even when it contains
/// `{input}` itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    prefix: String,
    suffix: String,
}

impl PromptTemplate {
    pub fn new(template: &str) -> Result<Self, ChatError> {
        let slots = template.matches(INPUT_SLOT).count();
        if slots != 1 {
            return Err(ChatError::construction(format!(
                "prompt template must contain exactly one {INPUT_SLOT} slot, found {slots}"
            )));
        }

        let (prefix, suffix) = template
            .split_once(INPUT_SLOT)
            .ok_or_else(|| ChatError::construction("prompt template has no input slot"))?;

        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    pub fn render(&self, input: &str) -> String {
        let mut prompt =
            String::with_capacity(self.prefix.len() + input.len() + self.suffix.len());
        prompt.push_str(&self.prefix);
        prompt.push_str(input);
        prompt.push_str(&self.suffix);
        prompt
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        let (prefix, suffix) = DEFAULT_TEMPLATE
            .split_once(INPUT_SLOT)
            .unwrap_or((DEFAULT_TEMPLATE, ""));
        Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_matches_parsed_default() {
        let parsed = PromptTemplate::new(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(parsed, PromptTemplate::default());
    }

    #[test]
    fn render_places_input_between_question_and_answer() {
        let rendered = PromptTemplate::default().render("Quanto é 2 + 2?");
        assert!(rendered.starts_with("Você é um chatbot útil e amigável"));
        assert!(rendered.ends_with("Pergunta: Quanto é 2 + 2?\nResposta:"));
    }

    #[test]
    fn render_contains_input_for_awkward_inputs() {
        let template = PromptTemplate::default();
        for input in ["", "   ", "{input}", "{{input}}", "Pergunta: {x}\nResposta:", "olá 👋"] {
            assert!(
                template.render(input).contains(input),
                "rendered prompt lost input {input:?}"
            );
        }
    }

    #[test]
    fn render_does_not_resubstitute_slot_in_input() {
        let template = PromptTemplate::new("[{input}]").unwrap();
        assert_eq!(template.render("{input}"), "[{input}]");
    }

    #[test]
    fn new_rejects_template_without_slot() {
        let err = PromptTemplate::new("no slot here").unwrap_err();
        assert!(matches!(err, ChatError::Construction(_)));
    }

    #[test]
    fn new_rejects_template_with_two_slots() {
        let err = PromptTemplate::new("{input} and {input}").unwrap_err();
        assert!(matches!(err, ChatError::Construction(_)));
    }
}
