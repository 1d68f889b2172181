//! Extraction service backed by an OpenAI-compatible chat completion API.

use async_trait::async_trait;
use ingest_core::{CollaboratorError, ExtractedCard, ExtractionOptions, ExtractionService};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::offline;

/// Longest input, in characters, sent to the remote service.
const MAX_INPUT_CHARS: usize = 12_000;

const SYSTEM_PROMPT: &str = "You create study flashcards. Reply with only a JSON array of \
objects with \"question\" and \"answer\" string fields. Questions must be answerable from \
the text alone; answers must be short.";

pub struct HttpExtractionService {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl HttpExtractionService {
    pub fn new(client: Client, endpoint: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
            model,
        }
    }

    async fn extract_remote(
        &self,
        text: &str,
        options: &ExtractionOptions,
    ) -> Result<Vec<ExtractedCard>, CollaboratorError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CollaboratorError::new("no API key configured"))?;

        let request = ChatRequest {
            model: &self.model,
            temperature: 0.2,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(text, options),
                },
            ],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CollaboratorError::new(format!("network error: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(CollaboratorError::new(format!(
                "service returned {}: {}",
                status,
                message.trim()
            )));
        }

        let response: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CollaboratorError::new(format!("invalid response: {}", e)))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CollaboratorError::new("response contained no choices"))?;

        let mut cards = parse_cards(&content)?;
        if let Some(max) = options.max_cards {
            cards.truncate(max);
        }
        Ok(cards)
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionService {
    async fn extract(
        &self,
        text: &str,
        options: &ExtractionOptions,
        simulated: bool,
    ) -> Result<Vec<ExtractedCard>, CollaboratorError> {
        if simulated {
            tracing::info!("simulated mode, generating flashcards offline");
            return Ok(offline::generate(text, options));
        }
        self.extract_remote(text, options).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    content: String,
}

/// Accepted reply shapes: a bare array or an object wrapping one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CardsReply {
    List(Vec<ExtractedCard>),
    Flashcards { flashcards: Vec<ExtractedCard> },
    Cards { cards: Vec<ExtractedCard> },
}

fn user_prompt(text: &str, options: &ExtractionOptions) -> String {
    let mut prompt = String::new();
    if let Some(max) = options.max_cards {
        prompt.push_str(&format!("Create at most {} flashcards.\n", max));
    }
    if let Some(focus) = options.focus.as_deref().filter(|f| !f.trim().is_empty()) {
        prompt.push_str(&format!("Focus on: {}\n", focus.trim()));
    }
    prompt.push_str("Text:\n");
    prompt.push_str(truncate_chars(text, MAX_INPUT_CHARS));
    prompt
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Parse the model's reply, tolerating a surrounding code fence.
pub fn parse_cards(content: &str) -> Result<Vec<ExtractedCard>, CollaboratorError> {
    let body = strip_code_fence(content);
    let reply: CardsReply = serde_json::from_str(body)
        .map_err(|e| CollaboratorError::new(format!("could not parse flashcards: {}", e)))?;

    Ok(match reply {
        CardsReply::List(cards) => cards,
        CardsReply::Flashcards { flashcards } => flashcards,
        CardsReply::Cards { cards } => cards,
    })
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop an info string such as `json` on the opening fence.
    match rest.find('\n') {
        Some(idx) if !rest[..idx].trim_start().starts_with(['[', '{']) => rest[idx + 1..].trim(),
        _ => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let cards = parse_cards(r#"[{"question":"Q1","answer":"A1"}]"#).unwrap();
        assert_eq!(cards, vec![ExtractedCard::new("Q1", "A1")]);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let content = "```json\n[{\"question\":\"Q1\",\"answer\":\"A1\"}]\n```";
        let cards = parse_cards(content).unwrap();
        assert_eq!(cards.len(), 1);

        let content = "```\n{\"flashcards\":[{\"question\":\"Q\",\"answer\":\"A\"}]}\n```";
        assert_eq!(parse_cards(content).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_wrapped_cards() {
        let content = r#"{"cards":[{"id":"x","question":"Q","answer":"A"}]}"#;
        let cards = parse_cards(content).unwrap();
        assert_eq!(cards[0].id.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_prose_fails() {
        let err = parse_cards("Sure! Here are some flashcards.").unwrap_err();
        assert!(err.to_string().starts_with("could not parse flashcards"));
    }

    #[test]
    fn test_user_prompt_includes_options() {
        let options = ExtractionOptions {
            max_cards: Some(5),
            focus: Some(" ownership ".to_string()),
        };
        let prompt = user_prompt("Body", &options);
        assert!(prompt.contains("at most 5"));
        assert!(prompt.contains("Focus on: ownership"));
        assert!(prompt.ends_with("Text:\nBody"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[tokio::test]
    async fn test_simulated_mode_skips_network() {
        let service = HttpExtractionService::new(
            Client::new(),
            "http://127.0.0.1:9/unreachable".to_string(),
            None,
            "model".to_string(),
        );
        let cards = service
            .extract(
                "Ferris the crab is the unofficial Rust mascot.",
                &ExtractionOptions::default(),
                true,
            )
            .await
            .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].answer, "mascot");
    }
}
