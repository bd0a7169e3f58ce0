use super::{ChatConversation, ChatService, ImageGenerationService};
use crate::request::ComposedRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Canned outcome for one mocked image call.
#[derive(Debug, Clone)]
pub enum MockImageReply {
    Image(String),
    Refusal(String),
    TransportFailure(String),
}

/// One call observed by [`MockImageGenerationClient`].
#[derive(Debug, Clone)]
pub struct RecordedImageCall {
    pub model: String,
    pub request: ComposedRequest,
}

pub const MOCK_IMAGE_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVQImWP4z8AAAAMBAQCc479ZAAAAAElFTkSuQmCC";

#[derive(Clone)]
pub struct MockImageGenerationClient {
    replies: Arc<Mutex<Vec<MockImageReply>>>,
    calls: Arc<Mutex<Vec<RecordedImageCall>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(self, reply: MockImageReply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn with_image_response(self, data_url: String) -> Self {
        self.with_reply(MockImageReply::Image(data_url))
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<RecordedImageCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate(&self, model: &str, request: &ComposedRequest) -> Result<String> {
        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedImageCall {
                model: model.to_string(),
                request: request.clone(),
            });
            calls.len()
        };

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Ok(MOCK_IMAGE_DATA_URL.to_string());
        }
        match &replies[(count - 1) % replies.len()] {
            MockImageReply::Image(url) => Ok(url.clone()),
            MockImageReply::Refusal(text) => Err(Error::ModelRefusal(text.clone())),
            MockImageReply::TransportFailure(message) => Err(Error::Transport(message.clone())),
        }
    }
}

/// Chat backend double that counts session creations and can hold replies
/// until released, for exercising resets that race an in-flight send.
#[derive(Clone)]
pub struct MockChatClient {
    responses: Arc<Mutex<Vec<String>>>,
    system_instructions: Arc<Mutex<Vec<String>>>,
    messages: Arc<Mutex<Vec<(usize, String)>>>,
    fail_sends: Arc<Mutex<usize>>,
    fail_opens: Arc<Mutex<usize>>,
    send_count: Arc<AtomicUsize>,
    gate: Option<Arc<MockSendGate>>,
}

/// Pause point for mocked sends.
#[derive(Default)]
pub struct MockSendGate {
    entered: Notify,
    release: Notify,
}

impl MockSendGate {
    /// Wait until a send has reached the gate.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let one waiting send complete.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            system_instructions: Arc::new(Mutex::new(Vec::new())),
            messages: Arc::new(Mutex::new(Vec::new())),
            fail_sends: Arc::new(Mutex::new(0)),
            fail_opens: Arc::new(Mutex::new(0)),
            send_count: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Fail the next `n` sends with a transport error.
    pub fn with_failing_sends(self, n: usize) -> Self {
        *self.fail_sends.lock().unwrap() = n;
        self
    }

    /// Fail the next `n` session creations with a transport error.
    pub fn with_failing_opens(self, n: usize) -> Self {
        *self.fail_opens.lock().unwrap() = n;
        self
    }

    /// Hold every send at `gate` until released.
    pub fn with_gate(mut self, gate: Arc<MockSendGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of sessions opened so far.
    pub fn get_session_count(&self) -> usize {
        self.system_instructions.lock().unwrap().len()
    }

    pub fn get_system_instructions(&self) -> Vec<String> {
        self.system_instructions.lock().unwrap().clone()
    }

    /// `(session index, message)` for every send attempt, in order.
    pub fn get_messages(&self) -> Vec<(usize, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn open_session(&self, system_instruction: &str) -> Result<Arc<dyn ChatConversation>> {
        {
            let mut fail_opens = self.fail_opens.lock().unwrap();
            if *fail_opens > 0 {
                *fail_opens -= 1;
                return Err(Error::Transport("mock session creation failed".to_string()));
            }
        }

        let index = {
            let mut instructions = self.system_instructions.lock().unwrap();
            instructions.push(system_instruction.to_string());
            instructions.len() - 1
        };

        Ok(Arc::new(MockConversation {
            index,
            client: self.clone(),
        }))
    }
}

struct MockConversation {
    index: usize,
    client: MockChatClient,
}

#[async_trait]
impl ChatConversation for MockConversation {
    async fn send_message(&self, message: &str) -> Result<String> {
        self.client
            .messages
            .lock()
            .unwrap()
            .push((self.index, message.to_string()));
        let count = self.client.send_count.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(gate) = &self.client.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        {
            let mut fail_sends = self.client.fail_sends.lock().unwrap();
            if *fail_sends > 0 {
                *fail_sends -= 1;
                return Err(Error::Transport("mock send failed".to_string()));
            }
        }

        let responses = self.client.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(format!("session {} heard: {}", self.index, message))
        } else {
            Ok(responses[(count - 1) % responses.len()].clone())
        }
    }
}
