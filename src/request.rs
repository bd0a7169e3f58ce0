//! Generation requests
//!
//! One variant per tool. Each variant carries exactly the inputs its tool
//! takes, so combinations such as an aspect ratio on an edit cannot be
//! expressed. [`GenerationRequest::compose`] turns a request into the ordered
//! image parts and the single instruction text sent to the model.

use crate::ai::EncodedImage;
use crate::catalog::Tool;
use crate::models::{AspectRatio, ModelTier};
use crate::{prompts, Error, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct LogoBrief {
    pub brand_name: String,
    pub industry: String,
    pub style: String,
    pub colors: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrandBrief {
    pub brand_name: String,
    pub description: String,
    pub theme: String,
    pub colors: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdBrief {
    /// Platform label such as `"Instagram Feed (1:1)"`; also picks the
    /// aspect ratio.
    pub platform: String,
    pub product_name: String,
    pub description: String,
    pub ad_type: String,
    pub style: String,
    pub price: String,
    pub cta: String,
    /// Scene setting for the product shot, e.g. "Studio Minimal".
    pub mood: Option<String>,
    pub product_image: Option<EncodedImage>,
}

impl AdBrief {
    pub const DEFAULT_PLATFORM: &'static str = "Instagram Feed (1:1)";
    pub const DEFAULT_AD_TYPE: &'static str = "Product Launch";
    pub const DEFAULT_STYLE: &'static str = "Modern & Clean";
    pub const DEFAULT_CTA: &'static str = "SHOP NOW";

    pub fn new(product_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            platform: Self::DEFAULT_PLATFORM.to_string(),
            product_name: product_name.into(),
            description: description.into(),
            ad_type: Self::DEFAULT_AD_TYPE.to_string(),
            style: Self::DEFAULT_STYLE.to_string(),
            price: String::new(),
            cta: Self::DEFAULT_CTA.to_string(),
            mood: None,
            product_image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    TextToImage {
        prompt: String,
        aspect_ratio: AspectRatio,
        tier: ModelTier,
    },
    EditImage {
        image: EncodedImage,
        instruction: String,
    },
    Enhance {
        image: EncodedImage,
    },
    FaceSwap {
        source: EncodedImage,
        target: EncodedImage,
    },
    BlurFaces {
        image: EncodedImage,
    },
    BackgroundReplace {
        image: EncodedImage,
        background: String,
    },
    ConsistentCharacter {
        reference: EncodedImage,
        scenario: String,
    },
    StyleTransfer {
        image: EncodedImage,
        style: String,
    },
    Merge {
        first: EncodedImage,
        second: EncodedImage,
        instruction: Option<String>,
    },
    Montage {
        images: Vec<EncodedImage>,
        style: String,
    },
    Logo(LogoBrief),
    BrandKit(BrandBrief),
    AdPost(AdBrief),
    ThumbnailMake {
        title: String,
        subject: Option<EncodedImage>,
        background: Option<EncodedImage>,
    },
}

/// The backend-facing form of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedRequest {
    /// Sent before the instruction, in this order.
    pub images: Vec<EncodedImage>,
    pub instruction: String,
    pub aspect_ratio: Option<AspectRatio>,
    pub tier: ModelTier,
}

impl GenerationRequest {
    pub fn tool(&self) -> Tool {
        match self {
            GenerationRequest::TextToImage { .. } => Tool::Generate,
            GenerationRequest::EditImage { .. } => Tool::Edit,
            GenerationRequest::Enhance { .. } => Tool::Enhance,
            GenerationRequest::FaceSwap { .. } => Tool::FaceSwap,
            GenerationRequest::BlurFaces { .. } => Tool::BlurFaces,
            GenerationRequest::BackgroundReplace { .. } => Tool::ChangeBackground,
            GenerationRequest::ConsistentCharacter { .. } => Tool::ConsistentCharacter,
            GenerationRequest::StyleTransfer { .. } => Tool::ArtisticEffect,
            GenerationRequest::Merge { .. } => Tool::Merge,
            GenerationRequest::Montage { .. } => Tool::Montage,
            GenerationRequest::Logo(_) => Tool::Logo,
            GenerationRequest::BrandKit(_) => Tool::BrandIdentity,
            GenerationRequest::AdPost(_) => Tool::AdPost,
            GenerationRequest::ThumbnailMake { .. } => Tool::Thumbnail,
        }
    }

    pub fn tier(&self) -> ModelTier {
        match self {
            GenerationRequest::TextToImage { tier, .. } => *tier,
            _ => ModelTier::Fast,
        }
    }

    /// Output proportions requested from the model, if the tool fixes any.
    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        match self {
            GenerationRequest::TextToImage { aspect_ratio, .. } => Some(*aspect_ratio),
            GenerationRequest::Montage { .. } | GenerationRequest::Logo(_) => {
                Some(AspectRatio::Square)
            }
            GenerationRequest::BrandKit(_) | GenerationRequest::ThumbnailMake { .. } => {
                Some(AspectRatio::Landscape)
            }
            GenerationRequest::AdPost(brief) => Some(AspectRatio::for_platform(&brief.platform)),
            _ => None,
        }
    }

    /// Short human-readable description stored with the gallery record.
    pub fn summary(&self) -> String {
        match self {
            GenerationRequest::TextToImage { prompt, .. } => prompt.clone(),
            GenerationRequest::EditImage { instruction, .. } => format!("Edit: {}", instruction),
            GenerationRequest::Enhance { .. } => "Image enhancement".to_string(),
            GenerationRequest::FaceSwap { .. } => "Face Swap".to_string(),
            GenerationRequest::BlurFaces { .. } => "Face blur".to_string(),
            GenerationRequest::BackgroundReplace { background, .. } => {
                format!("Background: {}", background)
            }
            GenerationRequest::ConsistentCharacter { scenario, .. } => {
                format!("Character: {}", scenario)
            }
            GenerationRequest::StyleTransfer { style, .. } => format!("Artistic effect: {}", style),
            GenerationRequest::Merge { instruction, .. } => match instruction {
                Some(text) if !text.trim().is_empty() => format!("Merge: {}", text),
                _ => "Merge".to_string(),
            },
            GenerationRequest::Montage { images, style } => {
                format!("Montage of {} images: {}", images.len(), style)
            }
            GenerationRequest::Logo(brief) => {
                format!("Logo: {}, Style: {}", brief.brand_name, brief.style)
            }
            GenerationRequest::BrandKit(brief) => format!("Brand identity: {}", brief.brand_name),
            GenerationRequest::AdPost(brief) => {
                format!("Ad: {} ({})", brief.product_name, brief.platform)
            }
            GenerationRequest::ThumbnailMake { title, .. } => format!("Thumbnail: {}", title),
        }
    }

    /// Build the ordered image list and the instruction text.
    pub fn compose(&self) -> Result<ComposedRequest> {
        let (images, instruction): (Vec<EncodedImage>, String) = match self {
            GenerationRequest::TextToImage { prompt, .. } => (vec![], prompt.clone()),
            GenerationRequest::EditImage { image, instruction } => {
                (vec![image.clone()], instruction.clone())
            }
            GenerationRequest::Enhance { image } => {
                (vec![image.clone()], prompts::render(prompts::ENHANCE, &[]))
            }
            GenerationRequest::FaceSwap { source, target } => (
                vec![source.clone(), target.clone()],
                prompts::render(prompts::FACE_SWAP, &[]),
            ),
            GenerationRequest::BlurFaces { image } => {
                (vec![image.clone()], prompts::render(prompts::BLUR_FACES, &[]))
            }
            GenerationRequest::BackgroundReplace { image, background } => (
                vec![image.clone()],
                prompts::render(prompts::REPLACE_BACKGROUND, &[("background", background)]),
            ),
            GenerationRequest::ConsistentCharacter {
                reference,
                scenario,
            } => (
                vec![reference.clone()],
                prompts::render(prompts::CONSISTENT_CHARACTER, &[("scenario", scenario)]),
            ),
            GenerationRequest::StyleTransfer { image, style } => (
                vec![image.clone()],
                prompts::render(prompts::STYLE_TRANSFER, &[("style", style)]),
            ),
            GenerationRequest::Merge {
                first,
                second,
                instruction,
            } => {
                let text = match instruction {
                    Some(text) if !text.trim().is_empty() => text.clone(),
                    _ => prompts::render(prompts::MERGE_DEFAULT, &[]),
                };
                (vec![first.clone(), second.clone()], text)
            }
            GenerationRequest::Montage { images, style } => {
                if images.is_empty() {
                    return Err(Error::MissingReferenceImage(
                        "a montage needs at least one image".to_string(),
                    ));
                }
                (
                    images.clone(),
                    prompts::render(prompts::MONTAGE, &[("style", style)]),
                )
            }
            GenerationRequest::Logo(brief) => (
                vec![],
                prompts::render(
                    prompts::LOGO,
                    &[
                        ("brand_name", &brief.brand_name),
                        ("industry", &brief.industry),
                        ("style", &brief.style),
                        ("colors", &brief.colors),
                    ],
                ),
            ),
            GenerationRequest::BrandKit(brief) => (
                vec![],
                prompts::render(
                    prompts::BRAND_IDENTITY,
                    &[
                        ("brand_name", &brief.brand_name),
                        ("description", &brief.description),
                        ("theme", &brief.theme),
                        ("colors", &brief.colors),
                    ],
                ),
            ),
            GenerationRequest::AdPost(brief) => compose_ad(brief),
            GenerationRequest::ThumbnailMake {
                title,
                subject,
                background,
            } => {
                let mut images = Vec::new();
                let mut lines = vec![prompts::render(prompts::THUMBNAIL, &[("title", title)])];
                if let Some(subject) = subject {
                    images.push(subject.clone());
                    lines.push(prompts::THUMBNAIL_WITH_SUBJECT.to_string());
                }
                match background {
                    Some(background) => {
                        images.push(background.clone());
                        lines.push(prompts::THUMBNAIL_WITH_BACKGROUND.to_string());
                    }
                    None => lines.push(prompts::THUMBNAIL_GENERATED_BACKGROUND.to_string()),
                }
                (images, lines.join("\n"))
            }
        };

        Ok(ComposedRequest {
            images,
            instruction,
            aspect_ratio: self.aspect_ratio(),
            tier: self.tier(),
        })
    }
}

fn compose_ad(brief: &AdBrief) -> (Vec<EncodedImage>, String) {
    let description = match brief.mood.as_deref().map(str::trim) {
        Some(mood) if !mood.is_empty() => format!(
            "{}. Show the product in a {} setting with professional lighting",
            brief.description, mood
        ),
        _ => brief.description.clone(),
    };

    let base = prompts::render(
        prompts::AD_POST,
        &[
            ("platform", &brief.platform),
            ("ad_type", &brief.ad_type),
            ("product_name", &brief.product_name),
            ("description", &description),
            ("price", &brief.price),
            ("cta", &brief.cta),
            ("style", &brief.style),
        ],
    );

    match &brief.product_image {
        Some(image) => (
            vec![image.clone()],
            format!("{}\n{}", base, prompts::AD_WITH_PRODUCT_IMAGE),
        ),
        None => (vec![], format!("{}\n{}", base, prompts::AD_GENERATED_PRODUCT)),
    }
}

/// Raw tool inputs as collected by a front end: free-text fields plus images
/// assigned to the tool's named slots.
#[derive(Debug, Clone, Default)]
pub struct ToolForm {
    fields: BTreeMap<String, String>,
    images: Vec<(String, EncodedImage)>,
}

impl ToolForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(key, value);
        self
    }

    pub fn with_image(mut self, slot: impl Into<String>, image: EncodedImage) -> Self {
        self.add_image(slot, image);
        self
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn add_image(&mut self, slot: impl Into<String>, image: EncodedImage) {
        self.images.push((slot.into(), image));
    }

    /// Non-blank value of a field.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.field(key)
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidInput(format!("'{}' must not be blank", key)))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.field(key).unwrap_or(default).to_string()
    }

    fn images_in(&self, slot: &str) -> Vec<EncodedImage> {
        self.images
            .iter()
            .filter(|(name, _)| name == slot)
            .map(|(_, image)| image.clone())
            .collect()
    }

    fn image(&self, slot: &str) -> Option<EncodedImage> {
        self.images_in(slot).into_iter().next()
    }

    fn required_image(&self, slot: &str) -> Result<EncodedImage> {
        self.image(slot)
            .ok_or_else(|| Error::MissingReferenceImage(format!("no image in slot '{}'", slot)))
    }
}

impl GenerationRequest {
    /// Build a request for `tool` from form inputs, validating the fields and
    /// image slots its descriptor declares.
    pub fn from_form(tool: Tool, form: &ToolForm) -> Result<Self> {
        let descriptor = tool.descriptor();
        for key in form.fields.keys() {
            let known = descriptor
                .required_fields
                .iter()
                .chain(descriptor.optional_fields)
                .any(|f| *f == key.as_str());
            if !known {
                return Err(Error::InvalidInput(format!(
                    "{} has no field '{}'",
                    descriptor.id, key
                )));
            }
        }
        for (slot, _) in &form.images {
            if !descriptor.image_slots.iter().any(|s| s.name == slot) {
                return Err(Error::InvalidInput(format!(
                    "{} has no image slot '{}'",
                    descriptor.id, slot
                )));
            }
        }
        for slot in descriptor.image_slots.iter().filter(|s| !s.repeated) {
            if form.images_in(slot.name).len() > 1 {
                return Err(Error::InvalidInput(format!(
                    "image slot '{}' takes a single image",
                    slot.name
                )));
            }
        }

        let request = match tool {
            Tool::Generate => GenerationRequest::TextToImage {
                prompt: form.required("prompt")?,
                aspect_ratio: match form.field("aspect_ratio") {
                    Some(raw) => raw.parse()?,
                    None => AspectRatio::Square,
                },
                tier: match form.field("tier") {
                    None | Some("fast") => ModelTier::Fast,
                    Some("hd") => ModelTier::Hd,
                    Some(other) => {
                        return Err(Error::InvalidInput(format!(
                            "unknown tier '{}', expected 'fast' or 'hd'",
                            other
                        )))
                    }
                },
            },
            Tool::Edit => GenerationRequest::EditImage {
                image: form.required_image("image")?,
                instruction: form.required("instruction")?,
            },
            Tool::Enhance => GenerationRequest::Enhance {
                image: form.required_image("image")?,
            },
            Tool::FaceSwap => GenerationRequest::FaceSwap {
                source: form.required_image("source")?,
                target: form.required_image("target")?,
            },
            Tool::BlurFaces => GenerationRequest::BlurFaces {
                image: form.required_image("image")?,
            },
            Tool::ChangeBackground => GenerationRequest::BackgroundReplace {
                image: form.required_image("image")?,
                background: form.required("background")?,
            },
            Tool::ConsistentCharacter => GenerationRequest::ConsistentCharacter {
                reference: form.required_image("reference")?,
                scenario: form.required("scenario")?,
            },
            Tool::ArtisticEffect => GenerationRequest::StyleTransfer {
                image: form.required_image("image")?,
                style: form.required("style")?,
            },
            Tool::Merge => GenerationRequest::Merge {
                first: form.required_image("first")?,
                second: form.required_image("second")?,
                instruction: form.field("instruction").map(str::to_string),
            },
            Tool::Montage => {
                let images = form.images_in("images");
                if images.is_empty() {
                    return Err(Error::MissingReferenceImage(
                        "a montage needs at least one image".to_string(),
                    ));
                }
                GenerationRequest::Montage {
                    images,
                    style: form.required("style")?,
                }
            }
            Tool::Logo => GenerationRequest::Logo(LogoBrief {
                brand_name: form.required("brand_name")?,
                industry: form.or_default("industry", "General"),
                style: form.or_default("style", "Minimalist"),
                colors: form.or_default("colors", "Designer's choice"),
            }),
            Tool::BrandIdentity => GenerationRequest::BrandKit(BrandBrief {
                brand_name: form.required("brand_name")?,
                description: form.required("description")?,
                theme: form.or_default("theme", "Modern"),
                colors: form.or_default("colors", "Designer's choice"),
            }),
            Tool::AdPost => GenerationRequest::AdPost(AdBrief {
                platform: form.or_default("platform", AdBrief::DEFAULT_PLATFORM),
                product_name: form.required("product_name")?,
                description: form.required("description")?,
                ad_type: form.or_default("ad_type", AdBrief::DEFAULT_AD_TYPE),
                style: form.or_default("style", AdBrief::DEFAULT_STYLE),
                price: form.or_default("price", ""),
                cta: form.or_default("cta", AdBrief::DEFAULT_CTA),
                mood: form.field("mood").map(str::to_string),
                product_image: form.image("product"),
            }),
            Tool::Thumbnail => GenerationRequest::ThumbnailMake {
                title: form.required("title")?,
                subject: form.image("subject"),
                background: form.image("background"),
            },
        };

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn image(tag: &str) -> EncodedImage {
        EncodedImage::from_data_url(&format!("data:image/png;base64,{}", tag)).unwrap()
    }

    #[test]
    fn test_ad_post_instruction_contains_fields_and_square_hint() {
        let form = ToolForm::new()
            .with_field("product_name", "LUMIX X5")
            .with_field("description", "low-light camera")
            .with_field("platform", "Instagram Feed (1:1)");
        let request = GenerationRequest::from_form(Tool::AdPost, &form).unwrap();
        let composed = request.compose().unwrap();

        assert!(composed.instruction.contains("LUMIX X5"));
        assert!(composed.instruction.contains("low-light camera"));
        assert!(composed.instruction.contains(prompts::AD_GENERATED_PRODUCT));
        assert!(composed.images.is_empty());
        assert_eq!(composed.aspect_ratio, Some(AspectRatio::Square));
    }

    #[test]
    fn test_ad_post_platform_sets_aspect_ratio() {
        let mut brief = AdBrief::new("Bag", "leather tote");
        brief.platform = "Stories (9:16)".to_string();
        assert_eq!(
            GenerationRequest::AdPost(brief.clone()).aspect_ratio(),
            Some(AspectRatio::Portrait)
        );
        brief.platform = "LinkedIn/Twitter (16:9)".to_string();
        assert_eq!(
            GenerationRequest::AdPost(brief).aspect_ratio(),
            Some(AspectRatio::Landscape)
        );
    }

    #[test]
    fn test_ad_post_keeps_placeholder_text_in_user_fields() {
        let mut brief = AdBrief::new("LUMIX X5", "Use code {{price}} at checkout");
        brief.price = "$99".to_string();
        let composed = GenerationRequest::AdPost(brief).compose().unwrap();
        assert!(composed
            .instruction
            .contains("Use code {{price}} at checkout"));
        assert!(composed.instruction.contains("Price/Deal: \"$99\""));
    }

    #[test]
    fn test_ad_post_with_product_image_and_mood() {
        let mut brief = AdBrief::new("Bag", "leather tote");
        brief.mood = Some("Sunny Beach".to_string());
        brief.product_image = Some(image("PRODUCT"));
        let composed = GenerationRequest::AdPost(brief).compose().unwrap();
        assert_eq!(composed.images, vec![image("PRODUCT")]);
        assert!(composed.instruction.contains("Sunny Beach"));
        assert!(composed.instruction.contains(prompts::AD_WITH_PRODUCT_IMAGE));
    }

    #[test]
    fn test_face_swap_order_is_source_then_target() {
        let a = image("AAAA");
        let b = image("BBBB");

        let composed = GenerationRequest::FaceSwap {
            source: a.clone(),
            target: b.clone(),
        }
        .compose()
        .unwrap();
        assert_eq!(composed.images, vec![a.clone(), b.clone()]);
        assert!(composed.instruction.contains("SOURCE FACE"));

        let swapped = GenerationRequest::FaceSwap {
            source: b.clone(),
            target: a.clone(),
        }
        .compose()
        .unwrap();
        assert_eq!(swapped.images, vec![b, a]);
        assert_eq!(swapped.aspect_ratio, None);
    }

    #[test]
    fn test_merge_uses_default_instruction_when_blank() {
        let composed = GenerationRequest::Merge {
            first: image("ONE"),
            second: image("TWO"),
            instruction: Some("   ".to_string()),
        }
        .compose()
        .unwrap();
        assert_eq!(composed.images, vec![image("ONE"), image("TWO")]);
        assert_eq!(
            composed.instruction,
            prompts::render(prompts::MERGE_DEFAULT, &[])
        );
    }

    #[test]
    fn test_montage_requires_images() {
        let err = GenerationRequest::Montage {
            images: vec![],
            style: "retro".to_string(),
        }
        .compose()
        .unwrap_err();
        assert!(matches!(err, Error::MissingReferenceImage(_)));
    }

    #[test]
    fn test_thumbnail_background_only() {
        let composed = GenerationRequest::ThumbnailMake {
            title: "I built a Rust crate".to_string(),
            subject: None,
            background: Some(image("BG")),
        }
        .compose()
        .unwrap();
        assert_eq!(composed.images, vec![image("BG")]);
        assert!(composed.instruction.contains("\"I built a Rust crate\""));
        assert!(composed
            .instruction
            .contains(prompts::THUMBNAIL_WITH_BACKGROUND));
        assert!(!composed.instruction.contains(prompts::THUMBNAIL_WITH_SUBJECT));
        assert_eq!(composed.aspect_ratio, Some(AspectRatio::Landscape));
    }

    #[test]
    fn test_text_to_image_passes_prompt_and_tier_through() {
        let request = GenerationRequest::TextToImage {
            prompt: "a lighthouse at dusk".to_string(),
            aspect_ratio: AspectRatio::Wide,
            tier: ModelTier::Hd,
        };
        let composed = request.compose().unwrap();
        assert_eq!(composed.instruction, "a lighthouse at dusk");
        assert_eq!(composed.aspect_ratio, Some(AspectRatio::Wide));
        assert_eq!(composed.tier, ModelTier::Hd);
        assert_eq!(request.summary(), "a lighthouse at dusk");
    }

    #[test]
    fn test_logo_and_brand_kit_fix_aspect_ratios() {
        let logo = GenerationRequest::Logo(LogoBrief {
            brand_name: "Orbit".to_string(),
            industry: "Coffee".to_string(),
            style: "Vintage".to_string(),
            colors: "brown, cream".to_string(),
        });
        let composed = logo.compose().unwrap();
        assert!(composed.instruction.contains("\"Orbit\""));
        assert!(composed.instruction.contains("Vintage"));
        assert_eq!(composed.aspect_ratio, Some(AspectRatio::Square));
        assert_eq!(logo.summary(), "Logo: Orbit, Style: Vintage");

        let kit = GenerationRequest::BrandKit(BrandBrief {
            brand_name: "Orbit".to_string(),
            description: "a roastery".to_string(),
            theme: "warm".to_string(),
            colors: "brown".to_string(),
        });
        assert_eq!(kit.aspect_ratio(), Some(AspectRatio::Landscape));
    }

    #[test]
    fn test_from_form_rejects_missing_reference_image() {
        for (tool, field) in [
            (Tool::Edit, Some("instruction")),
            (Tool::FaceSwap, None),
            (Tool::ChangeBackground, Some("background")),
            (Tool::Montage, Some("style")),
        ] {
            let form = match field {
                Some(key) => ToolForm::new().with_field(key, "x"),
                None => ToolForm::new(),
            };
            let err = GenerationRequest::from_form(tool, &form).unwrap_err();
            assert!(matches!(err, Error::MissingReferenceImage(_)), "{}", tool.id());
        }
    }

    #[test]
    fn test_from_form_face_swap_only_target_is_missing_source() {
        let form = ToolForm::new().with_image("target", image("B"));
        match GenerationRequest::from_form(Tool::FaceSwap, &form) {
            Err(Error::MissingReferenceImage(message)) => assert!(message.contains("source")),
            other => panic!("expected MissingReferenceImage, got {:?}", other),
        }
    }

    #[test]
    fn test_from_form_rejects_blank_required_field() {
        let form = ToolForm::new().with_field("prompt", "   ");
        let err = GenerationRequest::from_form(Tool::Generate, &form).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_from_form_rejects_unknown_slot_and_duplicates() {
        let form = ToolForm::new()
            .with_field("instruction", "x")
            .with_image("banner", image("A"));
        assert!(matches!(
            GenerationRequest::from_form(Tool::Edit, &form),
            Err(Error::InvalidInput(_))
        ));

        let form = ToolForm::new()
            .with_image("source", image("A"))
            .with_image("source", image("B"))
            .with_image("target", image("C"));
        assert!(matches!(
            GenerationRequest::from_form(Tool::FaceSwap, &form),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_form_rejects_unknown_field() {
        let form = ToolForm::new()
            .with_field("prompt", "neon city")
            .with_field("promt", "neon city");
        match GenerationRequest::from_form(Tool::Generate, &form) {
            Err(Error::InvalidInput(message)) => assert!(message.contains("promt")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        let form = ToolForm::new()
            .with_field("title", "Top 10")
            .with_field("style", "bold");
        assert!(matches!(
            GenerationRequest::from_form(Tool::Thumbnail, &form),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_form_generate_parses_aspect_and_tier() {
        let form = ToolForm::new()
            .with_field("prompt", "neon city")
            .with_field("aspect_ratio", "16:9")
            .with_field("tier", "hd");
        assert_eq!(
            GenerationRequest::from_form(Tool::Generate, &form).unwrap(),
            GenerationRequest::TextToImage {
                prompt: "neon city".to_string(),
                aspect_ratio: AspectRatio::Landscape,
                tier: ModelTier::Hd,
            }
        );

        let bad = form.clone().with_field("tier", "ultra");
        assert!(GenerationRequest::from_form(Tool::Generate, &bad).is_err());
    }

    #[test]
    fn test_from_form_montage_keeps_image_order() {
        let form = ToolForm::new()
            .with_field("style", "scrapbook")
            .with_image("images", image("ONE"))
            .with_image("images", image("TWO"))
            .with_image("images", image("THREE"));
        let composed = GenerationRequest::from_form(Tool::Montage, &form)
            .unwrap()
            .compose()
            .unwrap();
        assert_eq!(
            composed.images,
            vec![image("ONE"), image("TWO"), image("THREE")]
        );
    }

    #[test]
    fn test_every_request_maps_back_to_its_tool() {
        let request = GenerationRequest::StyleTransfer {
            image: image("A"),
            style: "Pop Art".to_string(),
        };
        assert_eq!(request.tool(), Tool::ArtisticEffect);
        assert_eq!(request.tier(), ModelTier::Fast);
        assert_eq!(request.summary(), "Artistic effect: Pop Art");
    }
}
