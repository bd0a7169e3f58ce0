//! Generative backend integration
//!
//! Gemini clients for image generation and chat, the data-URL codec and the
//! response unwrapper, plus in-memory mocks for tests.

pub mod codec;
pub mod gemini;
pub mod mime;
pub mod mock;
pub mod response;

pub use codec::EncodedImage;
pub use gemini::{GeminiChatClient, GeminiImageClient};
pub use mock::{
    MockChatClient, MockImageGenerationClient, MockImageReply, MockSendGate, RecordedImageCall,
    MOCK_IMAGE_DATA_URL,
};

use crate::request::ComposedRequest;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Image-producing backend: one request in, one displayable data URL out.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate(&self, model: &str, request: &ComposedRequest) -> Result<String>;
}

/// Chat backend capable of opening conversations primed with a persona.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn open_session(&self, system_instruction: &str) -> Result<Arc<dyn ChatConversation>>;
}

/// A live conversation. Each call sends one user turn and resolves once with
/// the complete assistant reply.
#[async_trait]
pub trait ChatConversation: Send + Sync {
    async fn send_message(&self, message: &str) -> Result<String>;
}
