use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
    InlineData, Part,
};
use crate::ai::{response, ImageGenerationService};
use crate::models::ModelTier;
use crate::request::ComposedRequest;
use crate::Result;
use async_trait::async_trait;

/// `imageSize` hint sent with HD-tier requests.
const HD_IMAGE_SIZE: &str = "1K";

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_http(GeminiHttpClient::new(api_key))
    }

    pub fn new_with_http(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    /// Wire form of a composed request: image parts in order, then the
    /// instruction as the final part.
    pub fn build_request(request: &ComposedRequest) -> GenerateContentRequest {
        let mut parts: Vec<Part> = request
            .images
            .iter()
            .map(|image| Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type().to_string(),
                    data: image.payload().to_string(),
                },
            })
            .collect();
        parts.push(Part::Text {
            text: request.instruction.clone(),
        });

        let image_size = match request.tier {
            ModelTier::Hd => Some(HD_IMAGE_SIZE.to_string()),
            ModelTier::Fast => None,
        };
        let image_config = if request.aspect_ratio.is_some() || image_size.is_some() {
            Some(ImageConfig {
                aspect_ratio: request.aspect_ratio.map(|r| r.as_str().to_string()),
                image_size,
            })
        } else {
            None
        };

        GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
                image_config,
            }),
        }
    }
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate(&self, model: &str, request: &ComposedRequest) -> Result<String> {
        tracing::debug!(
            "Requesting image from {} with {} reference image(s)",
            model,
            request.images.len()
        );

        let wire = Self::build_request(request);
        let gemini_response: GenerateContentResponse =
            self.http.generate_content(model, &wire).await?;

        response::extract_image(&gemini_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::ai::EncodedImage;
    use crate::models::AspectRatio;
    use crate::Error;
    use wiremock::matchers::body_string_contains;
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

    fn make_client(server: &MockServer) -> GeminiImageClient {
        GeminiImageClient::new("key".to_string()).with_base_url(server.uri())
    }

    fn composed(images: Vec<EncodedImage>, aspect_ratio: Option<AspectRatio>) -> ComposedRequest {
        ComposedRequest {
            images,
            instruction: "make it pop".to_string(),
            aspect_ratio,
            tier: ModelTier::Fast,
        }
    }

    fn image_reply() -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }]
                }
            }]
        })
    }

    #[test]
    fn test_build_request_puts_images_before_instruction() {
        let a = EncodedImage::from_data_url("data:image/jpeg;base64,AAAA").unwrap();
        let b = EncodedImage::from_data_url("data:image/png;base64,BBBB").unwrap();
        let wire = GeminiImageClient::build_request(&composed(vec![a, b], None));

        let json = serde_json::to_value(&wire).unwrap();
        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "BBBB");
        assert_eq!(parts[2]["text"], "make it pop");
        assert!(json["generationConfig"].get("imageConfig").is_none());
    }

    #[test]
    fn test_build_request_hd_tier_sets_image_size() {
        let mut request = composed(vec![], Some(AspectRatio::Portrait));
        request.tier = ModelTier::Hd;
        let json = serde_json::to_value(GeminiImageClient::build_request(&request)).unwrap();
        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "3:4");
        assert_eq!(json["generationConfig"]["imageConfig"]["imageSize"], "1K");
    }

    #[tokio::test]
    async fn test_generate_returns_data_url() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(image_reply()))
            .mount(&server)
            .await;

        let url = make_client(&server)
            .generate(DEFAULT_MODEL, &composed(vec![], None))
            .await
            .unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_request_carries_aspect_ratio_hint() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains("\"aspectRatio\":\"16:9\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(image_reply()))
            .expect(1)
            .mount(&server)
            .await;

        make_client(&server)
            .generate(
                DEFAULT_MODEL,
                &composed(vec![], Some(AspectRatio::Landscape)),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_text_reply_surfaces_as_model_refusal() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Please upload a photo with a visible face." }] }
                }]
            })))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate(DEFAULT_MODEL, &composed(vec![], None))
            .await
            .unwrap_err();
        match err {
            Error::ModelRefusal(text) => {
                assert_eq!(text, "Please upload a photo with a visible face.")
            }
            other => panic!("expected ModelRefusal, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_is_transport_failure() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate(DEFAULT_MODEL, &composed(vec![], None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_empty_response() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate(DEFAULT_MODEL, &composed(vec![], None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
    }
}
