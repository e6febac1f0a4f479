//! Chat template vocabulary and prompt assembly.

use hearth_config::{TemplateConfig, TemplateDelimiters, TemplateStyle};

/// Role-delimiter vocabulary for one backend's chat syntax.
///
/// Different models expect different turn markers, so the vocabulary comes
/// from configuration instead of being baked into prompt assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTemplate {
    system_open: String,
    system_close: String,
    user_open: String,
    user_close: String,
    assistant_open: String,
    stop: String,
}

impl ChatTemplate {
    /// ChatML markers (`<|im_start|>` / `<|im_end|>`).
    pub fn chatml() -> Self {
        Self {
            system_open: "<|im_start|>system".to_string(),
            system_close: "<|im_end|>".to_string(),
            user_open: "<|im_start|>user".to_string(),
            user_close: "<|im_end|>".to_string(),
            assistant_open: "<|im_start|>assistant\n".to_string(),
            stop: "<|im_end|>".to_string(),
        }
    }

    /// Llama-style `[INST]` markers.
    pub fn instruct() -> Self {
        Self {
            system_open: "[INST] <<SYS>>".to_string(),
            system_close: "<</SYS>>".to_string(),
            user_open: "".to_string(),
            user_close: " [/INST]".to_string(),
            assistant_open: "".to_string(),
            stop: "</s>".to_string(),
        }
    }

    /// Bare `role:` prefixes for templateless models.
    pub fn plain() -> Self {
        Self {
            system_open: "system:".to_string(),
            system_close: "".to_string(),
            user_open: "user:".to_string(),
            user_close: "".to_string(),
            assistant_open: "assistant: ".to_string(),
            stop: "\nuser:".to_string(),
        }
    }

    /// Resolve the template from config: explicit delimiters win over the
    /// named style.
    pub fn from_config(config: &TemplateConfig) -> Self {
        if let Some(custom) = &config.custom {
            return Self::custom(custom);
        }
        match config.style {
            TemplateStyle::Chatml => Self::chatml(),
            TemplateStyle::Instruct => Self::instruct(),
            TemplateStyle::Plain => Self::plain(),
        }
    }

    /// Build a template from explicit delimiters.
    pub fn custom(delimiters: &TemplateDelimiters) -> Self {
        Self {
            system_open: delimiters.system_open.clone(),
            system_close: delimiters.system_close.clone(),
            user_open: delimiters.user_open.clone(),
            user_close: delimiters.user_close.clone(),
            assistant_open: delimiters.assistant_open.clone(),
            stop: delimiters.stop.clone(),
        }
    }

    /// Stop sequences terminating a generation under this template.
    pub fn stop_sequences(&self) -> Vec<String> {
        vec![self.stop.clone()]
    }

    /// Assemble the model-ready prompt for one turn.
    ///
    /// Deterministic: identical inputs always produce the identical string.
    /// The retrieval context, when present, leads the system section; the
    /// memory context arrives already newline-prefixed from recall.
    pub fn build_prompt(
        &self,
        user_message: &str,
        persona: &str,
        memory_context: &str,
        retrieval_context: Option<&str>,
    ) -> String {
        let mut prompt = String::new();
        prompt.push_str(&self.system_open);
        prompt.push('\n');
        if let Some(context) = retrieval_context {
            prompt.push_str("Here is some context: ");
            prompt.push_str(context);
            prompt.push('\n');
        }
        prompt.push_str(persona);
        prompt.push_str(memory_context);
        prompt.push_str(&self.system_close);
        prompt.push('\n');
        prompt.push_str(&self.user_open);
        prompt.push('\n');
        prompt.push_str(user_message);
        prompt.push_str(&self.user_close);
        prompt.push('\n');
        prompt.push_str(&self.assistant_open);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::ChatTemplate;
    use hearth_config::{TemplateConfig, TemplateDelimiters, TemplateStyle};
    use pretty_assertions::assert_eq;

    #[test]
    fn build_prompt_is_deterministic() {
        let template = ChatTemplate::chatml();
        let a = template.build_prompt("hi", "You are Ember.", "\n[x] A said y", Some("ctx"));
        let b = template.build_prompt("hi", "You are Ember.", "\n[x] A said y", Some("ctx"));
        assert_eq!(a, b);
    }

    #[test]
    fn chatml_prompt_shape_matches_backend_contract() {
        let template = ChatTemplate::chatml();
        let prompt = template.build_prompt("What is Rust?", "You are Ember.", "", None);
        assert_eq!(
            prompt,
            "<|im_start|>system\nYou are Ember.<|im_end|>\n\
             <|im_start|>user\nWhat is Rust?<|im_end|>\n\
             <|im_start|>assistant\n"
        );
    }

    #[test]
    fn retrieval_context_leads_the_system_section() {
        let template = ChatTemplate::chatml();
        let prompt = template.build_prompt("q", "You are Ember.", "", Some("the passage"));
        assert!(
            prompt.starts_with("<|im_start|>system\nHere is some context: the passage\nYou are")
        );
    }

    #[test]
    fn memory_context_sits_between_persona_and_close() {
        let template = ChatTemplate::chatml();
        let prompt = template.build_prompt("q", "You are Ember.", "\n[t] A said hi", None);
        assert!(prompt.contains("You are Ember.\n[t] A said hi<|im_end|>"));
    }

    #[test]
    fn custom_delimiters_override_named_style() {
        let config = TemplateConfig {
            style: TemplateStyle::Chatml,
            custom: Some(TemplateDelimiters {
                system_open: "<<S>>".to_string(),
                system_close: "<</S>>".to_string(),
                user_open: "<<U>>".to_string(),
                user_close: "<</U>>".to_string(),
                assistant_open: "<<A>>".to_string(),
                stop: "<<END>>".to_string(),
            }),
        };
        let template = ChatTemplate::from_config(&config);
        assert_eq!(template.stop_sequences(), vec!["<<END>>".to_string()]);
        let prompt = template.build_prompt("q", "p", "", None);
        assert!(prompt.starts_with("<<S>>\np<</S>>"));
    }

    #[test]
    fn named_styles_resolve_from_config() {
        let config = TemplateConfig {
            style: TemplateStyle::Plain,
            custom: None,
        };
        assert_eq!(ChatTemplate::from_config(&config), ChatTemplate::plain());
    }
}
