use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::ai::{response, ChatConversation, ChatService};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct GeminiChatClient {
    http: GeminiHttpClient,
    model: String,
}

impl GeminiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_http(GeminiHttpClient::new(api_key), model)
    }

    pub fn new_with_http(http: GeminiHttpClient, model: String) -> Self {
        Self { http, model }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ChatService for GeminiChatClient {
    async fn open_session(&self, system_instruction: &str) -> Result<Arc<dyn ChatConversation>> {
        tracing::debug!("Opening Gemini chat session (model: {})", self.model);
        Ok(Arc::new(GeminiConversation {
            http: self.http.clone(),
            model: self.model.clone(),
            system_instruction: system_instruction.to_string(),
            history: Mutex::new(Vec::new()),
        }))
    }
}

/// A conversation whose history lives client-side and is replayed with the
/// system instruction on every turn.
pub struct GeminiConversation {
    http: GeminiHttpClient,
    model: String,
    system_instruction: String,
    history: Mutex<Vec<Content>>,
}

#[cfg(test)]
impl GeminiConversation {
    async fn turn_count(&self) -> usize {
        self.history.lock().await.len() / 2
    }
}

#[async_trait]
impl ChatConversation for GeminiConversation {
    async fn send_message(&self, message: &str) -> Result<String> {
        // Held across the call so turns on one conversation stay ordered.
        let mut history = self.history.lock().await;

        let mut contents = history.clone();
        contents.push(Content::user_text(message));

        let request = GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::Text {
                    text: self.system_instruction.clone(),
                }],
            }),
            contents,
            generation_config: None,
        };

        let gemini_response: GenerateContentResponse =
            self.http.generate_content(&self.model, &request).await?;
        let reply = response::extract_text(&gemini_response)?;

        history.push(Content::user_text(message));
        history.push(Content::model_text(reply.clone()));
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::Error;
    use wiremock::matchers::body_string_contains;
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

    fn make_client(server: &MockServer) -> GeminiChatClient {
        GeminiChatClient::new("test-key".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url(server.uri())
    }

    fn text_reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        }))
    }

    #[tokio::test]
    async fn test_send_message_returns_reply_and_attaches_persona() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains("design assistant persona"))
            .respond_with(text_reply("Use a 12-column grid."))
            .expect(1)
            .mount(&server)
            .await;

        let session = make_client(&server)
            .open_session("design assistant persona")
            .await
            .unwrap();
        let reply = session.send_message("How do I lay out a landing page?").await.unwrap();
        assert_eq!(reply, "Use a 12-column grid.");
    }

    #[tokio::test]
    async fn test_second_turn_replays_history() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains("first question"))
            .and(body_string_contains("first answer"))
            .respond_with(text_reply("second answer"))
            .expect(1)
            .mount(&server)
            .await;
        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(text_reply("first answer"))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let conversation = GeminiConversation {
            http: client.http.clone(),
            model: client.model.clone(),
            system_instruction: "persona".to_string(),
            history: Mutex::new(Vec::new()),
        };

        assert_eq!(
            conversation.send_message("first question").await.unwrap(),
            "first answer"
        );
        assert_eq!(
            conversation.send_message("follow up").await.unwrap(),
            "second answer"
        );
        assert_eq!(conversation.turn_count().await, 2);
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_history_untouched() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let conversation = GeminiConversation {
            http: client.http.clone(),
            model: client.model.clone(),
            system_instruction: "persona".to_string(),
            history: Mutex::new(Vec::new()),
        };

        let err = conversation.send_message("hello").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(conversation.turn_count().await, 0);
    }
}
