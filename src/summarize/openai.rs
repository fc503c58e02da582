//! OpenAI chat-completion summary model.

use super::{SummaryLength, SummaryModel};
use crate::error::{EduAidError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

const SYSTEM_PROMPT: &str = "You condense study material into a script that will be read aloud \
as a short podcast. Keep the key facts, definitions and conclusions. Write plain flowing prose: \
no headings, no bullet points, no markdown, no references to \"the text\" or \"the author\".";

/// Summary model backed by an OpenAI chat model.
pub struct OpenAIModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIModel {
    /// Create a model with the default chat model.
    pub fn new() -> Result<Self> {
        Self::with_config("gpt-4o-mini")
    }

    /// Create a model using `model`.
    pub fn with_config(model: &str) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl SummaryModel for OpenAIModel {
    #[instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| EduAidError::Summarization(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt(text, length))
                .build()
                .map_err(|e| EduAidError::Summarization(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.0)
            .build()
            .map_err(|e| EduAidError::Summarization(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| EduAidError::OpenAI(format!("{} API error: {}", self.model, e)))?;

        let summary = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| EduAidError::Summarization("empty response from model".to_string()))?;

        debug!("Summary has {} words", summary.split_whitespace().count());
        Ok(summary)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn user_prompt(text: &str, length: SummaryLength) -> String {
    format!(
        "Summarize the following text in {} to {} words.\n\nText:\n{}",
        length.min_words, length.max_words, text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_carries_bounds() {
        let prompt = user_prompt("Mitochondria make ATP.", SummaryLength::with_offset(301, 30));
        assert!(prompt.contains("271 to 301 words"));
        assert!(prompt.ends_with("Mitochondria make ATP."));
    }

    #[test]
    fn test_model_creation() {
        let model = OpenAIModel::with_config("gpt-4.1-mini").unwrap();
        assert_eq!(model.name(), "gpt-4.1-mini");
    }
}
