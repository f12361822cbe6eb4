use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;

/// Hosted model family, chosen from the model name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Anthropic,
    OpenAi,
}

impl Provider {
    pub fn from_model(model: &str) -> Self {
        if model.starts_with("claude") {
            Provider::Anthropic
        } else if model.starts_with("gemini") {
            Provider::Gemini
        } else {
            Provider::OpenAi
        }
    }

    /// Environment variable holding this provider's API key
    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GOOGLE_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::Anthropic => "Anthropic",
            Provider::OpenAi => "OpenAI",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A text-in, text-out language model
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generator backed by a hosted model's HTTP API
pub struct HttpGenerator {
    client: reqwest::Client,
    provider: Provider,
    model: String,
    api_key: String,
}

impl HttpGenerator {
    pub fn new(client: reqwest::Client, settings: &crate::config::Settings) -> Self {
        Self {
            client,
            provider: settings.provider,
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    async fn post(&self, request: reqwest::RequestBuilder, body: &serde_json::Value) -> Result<serde_json::Value> {
        let resp = request.header("Content-Type", "application/json").json(body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("{} API returned {status}: {body}", self.provider);
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            "Generating via {} API with model {} ({} prompt bytes)",
            self.provider,
            self.model,
            prompt.len()
        );

        let body = request_body(self.provider, &self.model, prompt);

        match self.provider {
            Provider::Gemini => {
                let url = format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                    self.model
                );
                let request = self.client.post(url).header("x-goog-api-key", &self.api_key);
                extract_gemini_text(&self.post(request, &body).await?)
            }
            Provider::Anthropic => {
                let request = self
                    .client
                    .post("https://api.anthropic.com/v1/messages")
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", "2023-06-01");
                extract_anthropic_text(&self.post(request, &body).await?)
            }
            Provider::OpenAi => {
                let request = self
                    .client
                    .post("https://api.openai.com/v1/chat/completions")
                    .bearer_auth(&self.api_key);
                extract_openai_text(&self.post(request, &body).await?)
            }
        }
    }
}

/// JSON request body carrying `prompt` as the sole user message
fn request_body(provider: Provider, model: &str, prompt: &str) -> serde_json::Value {
    match provider {
        Provider::Gemini => serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{"text": prompt}]
                }
            ]
        }),
        Provider::Anthropic => serde_json::json!({
            "model": model,
            "max_tokens": 4096,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        }),
        Provider::OpenAi => serde_json::json!({
            "model": model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        }),
    }
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String> {
    if let Some(reason) = json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        bail!("Gemini blocked the prompt: {reason}");
    }

    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str())
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }

    if let Some(reason) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("finishReason"))
        .and_then(|r| r.as_str())
    {
        bail!("Gemini returned no text (finish reason: {reason})");
    }

    bail!("unexpected Gemini API response format");
}

fn extract_anthropic_text(json: &serde_json::Value) -> Result<String> {
    if let Some(content) = json.get("content").and_then(|c| c.as_array()) {
        let text: String = content
            .iter()
            .filter_map(|block| {
                if block.get("type")?.as_str()? == "text" {
                    block.get("text")?.as_str().map(|s| s.to_string())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    bail!("unexpected Anthropic API response format");
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }
    bail!("unexpected OpenAI API response format");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_model() {
        assert_eq!(Provider::from_model("gemini-2.5-flash"), Provider::Gemini);
        assert_eq!(Provider::from_model("gemini-pro"), Provider::Gemini);
        assert_eq!(Provider::from_model("claude-sonnet-4-6"), Provider::Anthropic);
        assert_eq!(Provider::from_model("gpt-4o"), Provider::OpenAi);
        assert_eq!(Provider::from_model("gpt-4o-mini"), Provider::OpenAi);
    }

    #[test]
    fn test_provider_env_vars() {
        assert_eq!(Provider::Gemini.env_var(), "GOOGLE_API_KEY");
        assert_eq!(Provider::Anthropic.env_var(), "ANTHROPIC_API_KEY");
        assert_eq!(Provider::OpenAi.env_var(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_gemini_request_body_carries_prompt_verbatim() {
        let body = request_body(Provider::Gemini, "gemini-2.5-flash", "Summarize: hi there");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Summarize: hi there");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_anthropic_request_body_has_no_system_prompt() {
        let body = request_body(Provider::Anthropic, "claude-sonnet-4-6", "prompt text");
        assert_eq!(body["model"], "claude-sonnet-4-6");
        assert_eq!(body["messages"][0]["content"], "prompt text");
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_openai_request_body_single_message() {
        let body = request_body(Provider::OpenAi, "gpt-4o", "prompt text");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "prompt text");
    }

    #[test]
    fn test_extract_gemini_text() {
        let json = serde_json::json!({
            "candidates": [
                {
                    "content": {
                        "parts": [{"text": "- point one\n"}, {"text": "- point two"}],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }
            ]
        });
        assert_eq!(extract_gemini_text(&json).unwrap(), "- point one\n- point two");
    }

    #[test]
    fn test_extract_gemini_text_blocked() {
        let json = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = extract_gemini_text(&json).unwrap_err();
        assert_eq!(err.to_string(), "Gemini blocked the prompt: SAFETY");
    }

    #[test]
    fn test_extract_gemini_text_no_parts() {
        let json = serde_json::json!({"candidates": [{"finishReason": "MAX_TOKENS"}]});
        let err = extract_gemini_text(&json).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_extract_gemini_text_empty() {
        assert!(extract_gemini_text(&serde_json::json!({})).is_err());
    }

    #[test]
    fn test_extract_anthropic_text() {
        let json = serde_json::json!({
            "content": [
                {
                    "type": "text",
                    "text": "Here is the summary."
                }
            ]
        });
        assert_eq!(extract_anthropic_text(&json).unwrap(), "Here is the summary.");
    }

    #[test]
    fn test_extract_anthropic_text_empty() {
        let json = serde_json::json!({"content": []});
        assert!(extract_anthropic_text(&json).is_err());
    }

    #[test]
    fn test_extract_openai_text() {
        let json = serde_json::json!({
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "Answer about the video."
                    }
                }
            ]
        });
        assert_eq!(extract_openai_text(&json).unwrap(), "Answer about the video.");
    }

    #[test]
    fn test_extract_openai_text_empty() {
        let json = serde_json::json!({"choices": []});
        assert!(extract_openai_text(&json).is_err());
    }
}
