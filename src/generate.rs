//! Card generation through an OpenAI-compatible chat completions endpoint.
//!
//! The model is asked to answer in a small delimiter grammar:
//! `question ### answer ??? question ### answer ???`. [`parse_reply`] turns
//! that text into [`QaItem`]s. Requests run on a worker thread so the UI loop
//! keeps drawing while the model thinks.

use std::env;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::GenerationSettings;
use crate::models::QaItem;

/// Separates a question from its answer.
pub const TEXT_SEP: &str = "###";
/// Separates one question/answer pair from the next.
pub const ITEM_SEP: &str = "???";

pub const SYSTEM_PROMPT: &str = "You are an expert in creating `anki` cards which are short questions meant to help memorise the content presented.

You output question followed by an answer separated by `###`.
Each question answer pair is separated by `???`

e.g.
```
Question 1 ###
Answer 1
???
Question 2###
Answer 2
???
```

Keep following in mind:
1. The purpose of exercise is to retain important information, so don't create questions just for the sake of it.
2. Keep both the questions and answer concise and conceptual. Answers and questions don't need to be complete sentence, direct answers work.
3. Try to make questions which are self contained i.e. they do not reference anything like `previous paragraph`, `provided` code.
4. Where needed repeat the example or text block in discussion rather than referring to it.";

const API_KEY_VARS: [&str; 2] = ["MEMO_API_KEY", "OPENAI_API_KEY"];

/// Errors from the generation boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("source text is empty")]
    EmptySource,
    #[error("no API key configured (set MEMO_API_KEY or OPENAI_API_KEY)")]
    MissingApiKey,
    #[error("generation request failed with status {0}")]
    HttpStatus(StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("could not decode generation response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("generation returned an empty response")]
    EmptyResponse,
    #[error("generation worker stopped without a result")]
    WorkerGone,
}

/// Split a raw model reply into question/answer pairs.
///
/// Chunks that do not split into exactly one non-empty question and one
/// non-empty answer are dropped; the rest keep their original order.
pub fn parse_reply(reply: &str) -> Vec<QaItem> {
    let mut items = Vec::new();

    for chunk in reply.split(ITEM_SEP) {
        if chunk.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = chunk.split(TEXT_SEP).collect();
        let item = match parts.as_slice() {
            [question, answer] => QaItem::new(question, answer),
            _ => None,
        };

        match item {
            Some(item) => items.push(item),
            None => debug!(chunk = chunk.trim(), "dropping malformed chunk"),
        }
    }

    items
}

/// Something that can turn source text into a raw delimiter-grammar reply.
pub trait Generator: Send + Sync {
    fn generate(&self, source: &str) -> Result<String, GenerationError>;
}

/// Blocking chat completions client.
pub struct ChatClient {
    client: Client,
    settings: GenerationSettings,
    api_key: Option<String>,
}

impl ChatClient {
    pub fn new(
        settings: GenerationSettings,
        api_key: Option<String>,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            settings,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Build a client, taking the API key from the environment.
    pub fn from_env(settings: GenerationSettings) -> Result<Self, GenerationError> {
        let api_key = API_KEY_VARS.iter().find_map(|var| env::var(var).ok());
        Self::new(settings, api_key)
    }

    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Generator for ChatClient {
    fn generate(&self, source: &str) -> Result<String, GenerationError> {
        if source.trim().is_empty() {
            return Err(GenerationError::EmptySource);
        }
        let api_key = self.api_key.as_ref().ok_or(GenerationError::MissingApiKey)?;

        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: source,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            top_p: 1.0,
        };

        info!(model = %self.settings.model, chars = source.len(), "requesting cards");
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::HttpStatus(status));
        }

        let body: ChatResponse = serde_json::from_str(&response.text()?)?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// A generation request running on a worker thread.
pub struct GenerationJob {
    rx: Receiver<Result<Vec<QaItem>, GenerationError>>,
}

impl GenerationJob {
    pub fn spawn(generator: Arc<dyn Generator>, source: String) -> Result<Self, GenerationError> {
        if source.trim().is_empty() {
            return Err(GenerationError::EmptySource);
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = generator.generate(&source).map(|reply| parse_reply(&reply));
            match &result {
                Ok(items) => info!(count = items.len(), "generation finished"),
                Err(e) => warn!(error = %e, "generation failed"),
            }
            // Receiver may be gone if the app quit mid-request.
            let _ = tx.send(result);
        });

        Ok(Self { rx })
    }

    /// Non-blocking check for the result.
    pub fn poll(&self) -> Option<Result<Vec<QaItem>, GenerationError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(GenerationError::WorkerGone)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn pairs(items: &[QaItem]) -> Vec<(&str, &str)> {
        items
            .iter()
            .map(|i| (i.question.as_str(), i.answer.as_str()))
            .collect()
    }

    #[test]
    fn parses_well_formed_reply() {
        let items = parse_reply("Q1###A1???Q2###A2???");
        assert_eq!(pairs(&items), vec![("Q1", "A1"), ("Q2", "A2")]);
    }

    #[test]
    fn drops_malformed_middle_chunk() {
        let items = parse_reply("Q1###A1???garbage???Q2###A2");
        assert_eq!(pairs(&items), vec![("Q1", "A1"), ("Q2", "A2")]);
    }

    #[test]
    fn empty_reply_yields_nothing() {
        assert!(parse_reply("").is_empty());
        assert!(parse_reply("  \n ??? ").is_empty());
    }

    #[test]
    fn extra_separator_discards_only_that_chunk() {
        let items = parse_reply("Q1###A1###oops???Q2###A2???###A3???Q4###");
        assert_eq!(pairs(&items), vec![("Q2", "A2")]);
    }

    #[test]
    fn trims_multiline_model_output() {
        let reply = "What is a qubit? ###\nA quantum bit\n???\nWho proposed the hypothesis?###\nBernhard Riemann\n???\n";
        let items = parse_reply(reply);
        assert_eq!(
            pairs(&items),
            vec![
                ("What is a qubit?", "A quantum bit"),
                ("Who proposed the hypothesis?", "Bernhard Riemann"),
            ]
        );
    }

    fn settings(base_url: String) -> GenerationSettings {
        GenerationSettings {
            base_url,
            ..Default::default()
        }
    }

    #[test]
    fn client_posts_prompt_and_returns_content() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::PartialJson(serde_json::json!({
                    "model": "gpt-4-turbo",
                    "max_tokens": 500
                })),
                mockito::Matcher::Regex("Genetics is the study of genes.".into()),
                mockito::Matcher::Regex("anki".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"  What is genetics?###The study of genes???  "}}]}"#)
            .create();

        let client = ChatClient::new(settings(server.url()), Some("test-key".into())).unwrap();
        let reply = client.generate("Genetics is the study of genes.").unwrap();

        mock.assert();
        assert_eq!(reply, "What is genetics?###The study of genes???");
    }

    #[test]
    fn client_reports_http_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .create();

        let client = ChatClient::new(settings(server.url()), Some("k".into())).unwrap();
        let err = client.generate("text").unwrap_err();
        assert!(matches!(err, GenerationError::HttpStatus(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn client_rejects_empty_choices() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create();

        let client = ChatClient::new(settings(server.url()), Some("k".into())).unwrap();
        assert!(matches!(
            client.generate("text"),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn client_without_key_never_sends() {
        let client = ChatClient::new(settings("http://127.0.0.1:9".into()), Some("  ".into())).unwrap();
        assert!(!client.enabled());
        assert!(matches!(
            client.generate("text"),
            Err(GenerationError::MissingApiKey)
        ));
        assert!(matches!(client.generate(" "), Err(GenerationError::EmptySource)));
    }

    struct Canned(Result<&'static str, ()>);

    impl Generator for Canned {
        fn generate(&self, _source: &str) -> Result<String, GenerationError> {
            self.0
                .map(str::to_string)
                .map_err(|_| GenerationError::EmptyResponse)
        }
    }

    fn wait(job: &GenerationJob) -> Result<Vec<QaItem>, GenerationError> {
        let start = Instant::now();
        loop {
            if let Some(result) = job.poll() {
                return result;
            }
            assert!(start.elapsed() < Duration::from_secs(5), "job never finished");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn job_parses_reply_off_thread() {
        let job = GenerationJob::spawn(Arc::new(Canned(Ok("Q###A???"))), "text".into()).unwrap();
        let items = wait(&job).unwrap();
        assert_eq!(pairs(&items), vec![("Q", "A")]);
    }

    #[test]
    fn job_forwards_failure() {
        let job = GenerationJob::spawn(Arc::new(Canned(Err(()))), "text".into()).unwrap();
        assert!(matches!(wait(&job), Err(GenerationError::EmptyResponse)));
    }

    #[test]
    fn job_refuses_blank_source() {
        assert!(matches!(
            GenerationJob::spawn(Arc::new(Canned(Ok(""))), "  \n".into()),
            Err(GenerationError::EmptySource)
        ));
    }
}
