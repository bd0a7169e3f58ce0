//! Application wiring for the command-line front end.

use crate::ai::gemini::GeminiHttpClient;
use crate::ai::{
    ChatService, EncodedImage, GeminiChatClient, GeminiImageClient, ImageGenerationService,
};
use crate::catalog::Tool;
use crate::chat::{ChatReply, ChatSession, SEND_FAILED};
use crate::client::GenerationClient;
use crate::models::Config;
use crate::request::{GenerationRequest, ToolForm};
use crate::studio::{Panel, Studio};
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

const STALE_PREFIX: &str = "[earlier session] ";

/// Owns the generation client, the chat session and the in-memory studio.
pub struct App {
    generator: GenerationClient,
    chat: ChatSession,
    studio: Studio,
    output_dir: PathBuf,
}

/// Injectable backends used to construct [`App`] in tests and harnesses.
pub struct AppServices {
    pub image_gen: Arc<dyn ImageGenerationService>,
    pub chat: Arc<dyn ChatService>,
}

impl App {
    /// Build an app from concrete backends, with default model ids.
    pub fn with_services(services: AppServices, output_dir: PathBuf) -> Self {
        Self {
            generator: GenerationClient::new(services.image_gen),
            chat: ChatSession::new(services.chat),
            studio: Studio::new(),
            output_dir,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::from_config(&config))
    }

    pub fn from_config(config: &Config) -> Self {
        // One connection pool for both backends.
        let http = GeminiHttpClient::new_with_client(
            config.gemini_api_key.clone(),
            reqwest::Client::new(),
        )
        .with_base_url(config.gemini_base_url.clone())
        .with_timeout(config.request_timeout);

        info!(
            "Image models: {} (fast), {} (hd); chat model: {}",
            config.image_model, config.hd_image_model, config.chat_model
        );
        if config.request_timeout.is_none() {
            info!("No request timeout configured");
        }

        let services = AppServices {
            image_gen: Arc::new(GeminiImageClient::new_with_http(http.clone())),
            chat: Arc::new(GeminiChatClient::new_with_http(
                http,
                config.chat_model.clone(),
            )),
        };

        let mut app = Self::with_services(services, config.output_dir.clone());
        app.generator = app
            .generator
            .with_models(config.image_model.clone(), config.hd_image_model.clone());
        app
    }

    pub fn studio(&self) -> &Studio {
        &self.studio
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run one tool, add the result to the gallery and export it to
    /// `out_dir` (the configured output directory when `None`).
    pub async fn run_tool(
        &mut self,
        tool: Tool,
        form: &ToolForm,
        out_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        self.studio.open(Panel::Tool(tool));
        let request = GenerationRequest::from_form(tool, form)?;

        let url = self.generator.generate(&request).await?;
        let model = self.generator.model_for(&request).to_string();
        let record = self.studio.record_generation(&request, url, &model);
        info!("[{}] Generated: {}", tool.id(), record.prompt_summary);

        record.export_to(out_dir.unwrap_or(self.output_dir.as_path()))
    }

    /// Send one chat turn and record both sides in the transcript.
    pub async fn chat_turn(&mut self, message: &str) -> Result<ChatReply> {
        self.studio.open(Panel::Chat);
        self.studio.transcript.push_user(message);
        let outcome = self.chat.send_turn(message).await;
        self.studio.transcript.record_outcome(&outcome);
        outcome
    }

    pub async fn reset_chat(&mut self) {
        self.chat.reset().await;
        self.studio.transcript.reset();
    }

    /// Line-oriented chat loop. `/reset` starts a new session, `/quit` or end
    /// of input stops.
    pub async fn chat_repl<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if let Some(greeting) = self.studio.transcript.messages().last() {
            output
                .write_all(format!("{}\n", greeting.text).as_bytes())
                .await?;
        }

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            match line {
                "" => continue,
                "/quit" => break,
                "/reset" => {
                    self.reset_chat().await;
                    if let Some(greeting) = self.studio.transcript.messages().last() {
                        output
                            .write_all(format!("{}\n", greeting.text).as_bytes())
                            .await?;
                    }
                }
                message => {
                    let reply = match self.chat_turn(message).await {
                        Ok(reply) if reply.stale => format!("{}{}", STALE_PREFIX, reply.text),
                        Ok(reply) => reply.text,
                        Err(e) => {
                            error!("Chat turn failed: {}", e);
                            SEND_FAILED.to_string()
                        }
                    };
                    output.write_all(format!("{}\n", reply).as_bytes()).await?;
                }
            }
            output.flush().await?;
        }

        output.flush().await?;
        Ok(())
    }
}

/// Read an image file for a tool slot.
pub fn load_image(path: &Path) -> Result<EncodedImage> {
    EncodedImage::from_bytes(&fs::read(path)?)
}

/// One line per tool: id, label, fields and image slots.
pub fn describe_tools() -> Vec<String> {
    Tool::ALL
        .iter()
        .map(|tool| {
            let d = tool.descriptor();
            let mut line = format!("{:<16} {}", d.id, d.label);
            if !d.required_fields.is_empty() {
                line.push_str(&format!("  fields: {}", d.required_fields.join(", ")));
            }
            if !d.optional_fields.is_empty() {
                line.push_str(&format!("  optional: {}", d.optional_fields.join(", ")));
            }
            if !d.image_slots.is_empty() {
                let slots: Vec<String> = d
                    .image_slots
                    .iter()
                    .map(|s| match (s.required, s.repeated) {
                        (_, true) => format!("{}...", s.name),
                        (true, false) => s.name.to_string(),
                        (false, false) => format!("[{}]", s.name),
                    })
                    .collect();
                line.push_str(&format!("  images: {}", slots.join(", ")));
            }
            line
        })
        .collect()
}
