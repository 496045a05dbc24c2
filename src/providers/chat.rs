//! Chat-completion responder

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use super::Respond;
use crate::session::ChatMessage;
use crate::{Error, Result};

/// Selectable chat-completion model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatModel {
    /// Higher-capability variant ("gpt-4")
    #[default]
    HighCapability,
    /// Faster, cheaper variant ("gpt-3.5-turbo")
    FastCheap,
}

impl ChatModel {
    /// API model identifier, passed through unmodified
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::HighCapability => "gpt-4",
            Self::FastCheap => "gpt-3.5-turbo",
        }
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChatModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gpt-4" | "high" => Ok(Self::HighCapability),
            "gpt-3.5-turbo" | "fast" => Ok(Self::FastCheap),
            other => Err(Error::Config(format!("unknown chat model: {other}"))),
        }
    }
}

/// Response from the chat-completion API
#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(serde::Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Produces replies via the OpenAI chat-completion API
pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
}

impl ChatClient {
    /// Create a new chat client
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("OpenAI API key required for chat".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

#[async_trait]
impl Respond for ChatClient {
    async fn respond(&self, history: &[ChatMessage], model: ChatModel) -> Result<String> {
        #[derive(serde::Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
        }

        tracing::debug!(model = %model, messages = history.len(), "requesting reply");

        let request = ChatRequest {
            model: model.id(),
            messages: history,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "chat request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat API error");
            return Err(Error::Chat(format!("chat API error {status}: {body}")));
        }

        let result: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse chat response");
            e
        })?;

        let reply = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Chat("chat API returned no choices".to_string()))?;

        tracing::info!(reply_len = reply.len(), "reply received");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_ids_round_trip() {
        assert_eq!(ChatModel::HighCapability.id(), "gpt-4");
        assert_eq!(ChatModel::FastCheap.id(), "gpt-3.5-turbo");
        assert_eq!("gpt-4".parse::<ChatModel>().unwrap(), ChatModel::HighCapability);
        assert_eq!("fast".parse::<ChatModel>().unwrap(), ChatModel::FastCheap);
        assert!("gpt-5000".parse::<ChatModel>().is_err());
    }
}
