use log::{debug, warn};

use crate::generate::Generator;
use crate::{Error, Result};

pub const SUMMARY_PROMPT: &str =
    "You are a YouTube video summarizer. Summarize the provided YouTube transcript text in bullet points.";

pub const QUESTION_PROMPT: &str = "You are an assistant that answers questions based on YouTube transcript text. \
Given the transcript text and a question, provide a detailed answer.";

const QUESTION_SEPARATOR: &str = " Question: ";

/// Instruction texts, fixed for the life of the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub summary: String,
    pub question: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            summary: SUMMARY_PROMPT.to_string(),
            question: QUESTION_PROMPT.to_string(),
        }
    }
}

impl Prompts {
    /// Built-in prompts with optional overrides from the config file
    pub fn from_config(config: &crate::config::Config) -> Self {
        let defaults = Self::default();
        Self {
            summary: config.summary_prompt.clone().unwrap_or(defaults.summary),
            question: config.question_prompt.clone().unwrap_or(defaults.question),
        }
    }

    pub fn summary_prompt(&self, transcript: &str) -> String {
        format!("{}{transcript}", self.summary)
    }

    pub fn question_prompt(&self, transcript: &str, question: &str) -> String {
        format!("{}{transcript}{QUESTION_SEPARATOR}{question}", self.question)
    }
}

/// Sends instruction + transcript to the model, one request per call
pub struct Dispatcher<G> {
    generator: G,
    prompts: Prompts,
}

impl<G: Generator> Dispatcher<G> {
    pub fn new(generator: G, prompts: Prompts) -> Self {
        Self { generator, prompts }
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    pub async fn summarize(&self, transcript: &str) -> Result<String> {
        debug!("Requesting summary ({} transcript bytes)", transcript.len());
        self.dispatch(&self.prompts.summary_prompt(transcript)).await
    }

    pub async fn answer(&self, transcript: &str, question: &str) -> Result<String> {
        debug!("Requesting answer to {question:?}");
        self.dispatch(&self.prompts.question_prompt(transcript, question)).await
    }

    async fn dispatch(&self, prompt: &str) -> Result<String> {
        self.generator.generate(prompt).await.map_err(|e| {
            warn!("Generation failed: {e:#}");
            Error::Generation(format!("{e:#}"))
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Generator that records every prompt and replies with a canned result
    #[derive(Clone)]
    pub(crate) struct MockGenerator {
        pub(crate) reply: std::result::Result<String, String>,
        pub(crate) prompts: Arc<Mutex<Vec<String>>>,
    }

    impl MockGenerator {
        pub(crate) fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn sent(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for MockGenerator {
        async fn generate(&self, prompt: &str) -> eyre::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(eyre::eyre!("{message}")),
            }
        }
    }

    #[test]
    fn test_summary_prompt_has_no_separator() {
        let prompts = Prompts::default();
        assert_eq!(prompts.summary_prompt(" hi there"), format!("{SUMMARY_PROMPT} hi there"));
        assert_eq!(prompts.summary_prompt("x"), format!("{SUMMARY_PROMPT}x"));
    }

    #[test]
    fn test_question_prompt_layout() {
        let prompts = Prompts::default();
        assert_eq!(
            prompts.question_prompt(" hi there", "Q?"),
            format!("{QUESTION_PROMPT} hi there Question: Q?")
        );
    }

    #[test]
    fn test_prompts_from_config_overrides() {
        let config = crate::config::Config {
            summary_prompt: Some("TL;DR:".to_string()),
            ..Default::default()
        };
        let prompts = Prompts::from_config(&config);
        assert_eq!(prompts.summary, "TL;DR:");
        assert_eq!(prompts.question, QUESTION_PROMPT);
    }

    #[tokio::test]
    async fn test_summarize_sends_exact_prompt() {
        let generator = MockGenerator::replying("- point one");
        let dispatcher = Dispatcher::new(generator.clone(), Prompts::default());

        let summary = dispatcher.summarize(" hi there").await.unwrap();

        assert_eq!(summary, "- point one");
        assert_eq!(generator.sent(), vec![format!("{SUMMARY_PROMPT} hi there")]);
    }

    #[tokio::test]
    async fn test_answer_sends_exact_prompt() {
        let generator = MockGenerator::replying("It is about greetings.");
        let dispatcher = Dispatcher::new(generator.clone(), Prompts::default());

        let answer = dispatcher.answer(" hi there", "Q?").await.unwrap();

        assert_eq!(answer, "It is about greetings.");
        assert_eq!(
            generator.sent(),
            vec![QUESTION_PROMPT.to_string() + " hi there" + " Question: " + "Q?"]
        );
    }

    #[tokio::test]
    async fn test_response_returned_verbatim() {
        let reply = "  **Summary**\n\n- a\n- b\n  ";
        let dispatcher = Dispatcher::new(MockGenerator::replying(reply), Prompts::default());
        assert_eq!(dispatcher.summarize(" t").await.unwrap(), reply);
    }

    #[tokio::test]
    async fn test_generation_failure_is_typed() {
        let generator = MockGenerator::failing("Gemini API returned 403 Forbidden: quota");
        let dispatcher = Dispatcher::new(generator.clone(), Prompts::default());

        let err = dispatcher.answer(" t", "why?").await.unwrap_err();

        match err {
            Error::Generation(cause) => assert!(cause.contains("403 Forbidden")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(generator.sent().len(), 1);
    }
}
