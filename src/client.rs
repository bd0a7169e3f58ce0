//! Generation client
//!
//! One async function per creative operation. Each builds a
//! [`GenerationRequest`], composes it and issues exactly one backend call.
//! Image inputs arrive as data URLs, the way an upload control produces
//! them, and a malformed one fails before anything is sent. Nothing here
//! retries or touches gallery state.

use crate::ai::{EncodedImage, ImageGenerationService};
use crate::models::{AspectRatio, ModelTier, DEFAULT_HD_IMAGE_MODEL, DEFAULT_IMAGE_MODEL};
use crate::request::{AdBrief, BrandBrief, GenerationRequest, LogoBrief};
use crate::Result;
use std::sync::Arc;
use tracing::{debug, error};

pub struct GenerationClient {
    backend: Arc<dyn ImageGenerationService>,
    fast_model: String,
    hd_model: String,
}

fn decode(data_url: &str) -> Result<EncodedImage> {
    EncodedImage::from_data_url(data_url)
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn ImageGenerationService>) -> Self {
        Self {
            backend,
            fast_model: DEFAULT_IMAGE_MODEL.to_string(),
            hd_model: DEFAULT_HD_IMAGE_MODEL.to_string(),
        }
    }

    pub fn with_models(mut self, fast_model: String, hd_model: String) -> Self {
        self.fast_model = fast_model;
        self.hd_model = hd_model;
        self
    }

    /// Model id a request will run on.
    pub fn model_for(&self, request: &GenerationRequest) -> &str {
        match request.tier() {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Hd => &self.hd_model,
        }
    }

    /// Run any request. Every per-tool function below ends up here.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let tool = request.tool();
        let model = self.model_for(request);
        let composed = request.compose()?;

        debug!(
            "[{}] Sending {} image(s) to {} (aspect ratio: {})",
            tool.id(),
            composed.images.len(),
            model,
            composed
                .aspect_ratio
                .map(|r| r.as_str())
                .unwrap_or("unchanged")
        );

        self.backend.generate(model, &composed).await.map_err(|e| {
            error!("[{}] Generation failed: {}", tool.id(), e);
            e
        })
    }

    pub async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        tier: ModelTier,
    ) -> Result<String> {
        self.generate(&GenerationRequest::TextToImage {
            prompt: prompt.to_string(),
            aspect_ratio,
            tier,
        })
        .await
    }

    pub async fn edit_image(&self, image: &str, instruction: &str) -> Result<String> {
        self.generate(&GenerationRequest::EditImage {
            image: decode(image)?,
            instruction: instruction.to_string(),
        })
        .await
    }

    pub async fn enhance_image(&self, image: &str) -> Result<String> {
        self.generate(&GenerationRequest::Enhance {
            image: decode(image)?,
        })
        .await
    }

    /// Put the face from `face_image` onto the person in `target_image`.
    pub async fn swap_faces(&self, face_image: &str, target_image: &str) -> Result<String> {
        self.generate(&GenerationRequest::FaceSwap {
            source: decode(face_image)?,
            target: decode(target_image)?,
        })
        .await
    }

    pub async fn blur_faces(&self, image: &str) -> Result<String> {
        self.generate(&GenerationRequest::BlurFaces {
            image: decode(image)?,
        })
        .await
    }

    pub async fn replace_background(&self, image: &str, background: &str) -> Result<String> {
        self.generate(&GenerationRequest::BackgroundReplace {
            image: decode(image)?,
            background: background.to_string(),
        })
        .await
    }

    pub async fn consistent_character(&self, reference: &str, scenario: &str) -> Result<String> {
        self.generate(&GenerationRequest::ConsistentCharacter {
            reference: decode(reference)?,
            scenario: scenario.to_string(),
        })
        .await
    }

    pub async fn apply_style(&self, image: &str, style: &str) -> Result<String> {
        self.generate(&GenerationRequest::StyleTransfer {
            image: decode(image)?,
            style: style.to_string(),
        })
        .await
    }

    pub async fn merge_images(
        &self,
        first: &str,
        second: &str,
        instruction: Option<&str>,
    ) -> Result<String> {
        self.generate(&GenerationRequest::Merge {
            first: decode(first)?,
            second: decode(second)?,
            instruction: instruction.map(str::to_string),
        })
        .await
    }

    pub async fn montage(&self, images: &[&str], style: &str) -> Result<String> {
        let images = images
            .iter()
            .map(|image| decode(image))
            .collect::<Result<Vec<_>>>()?;
        self.generate(&GenerationRequest::Montage {
            images,
            style: style.to_string(),
        })
        .await
    }

    pub async fn logo(&self, brief: LogoBrief) -> Result<String> {
        self.generate(&GenerationRequest::Logo(brief)).await
    }

    pub async fn brand_identity(&self, brief: BrandBrief) -> Result<String> {
        self.generate(&GenerationRequest::BrandKit(brief)).await
    }

    pub async fn ad_post(&self, brief: AdBrief) -> Result<String> {
        self.generate(&GenerationRequest::AdPost(brief)).await
    }

    pub async fn youtube_thumbnail(
        &self,
        title: &str,
        subject_image: Option<&str>,
        background_image: Option<&str>,
    ) -> Result<String> {
        self.generate(&GenerationRequest::ThumbnailMake {
            title: title.to_string(),
            subject: subject_image.map(decode).transpose()?,
            background: background_image.map(decode).transpose()?,
        })
        .await
    }
}
