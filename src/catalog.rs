//! Declarative tool table
//!
//! Every creative tool is described once here; the front end and the gallery
//! read ids, labels, form fields and image slots from this table instead of
//! hard-coding them per tool.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Generate,
    Edit,
    Enhance,
    FaceSwap,
    #[serde(rename = "blur-face")]
    BlurFaces,
    #[serde(rename = "change-bg")]
    ChangeBackground,
    #[serde(rename = "consistent-char")]
    ConsistentCharacter,
    #[serde(rename = "effects")]
    ArtisticEffect,
    Merge,
    Montage,
    Logo,
    BrandIdentity,
    #[serde(rename = "ads")]
    AdPost,
    Thumbnail,
}

/// A named image input. Slot order is the order images are sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSlot {
    pub name: &'static str,
    pub required: bool,
    /// Accepts any number of images.
    pub repeated: bool,
}

const fn slot(name: &'static str) -> ImageSlot {
    ImageSlot {
        name,
        required: true,
        repeated: false,
    }
}

const fn optional_slot(name: &'static str) -> ImageSlot {
    ImageSlot {
        name,
        required: false,
        repeated: false,
    }
}

/// Static description of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    /// Suffix appended to the model id in gallery records, e.g.
    /// `gemini-2.5-flash-image (FaceSwap)`. `None` records the bare model id.
    pub model_label: Option<&'static str>,
    pub required_fields: &'static [&'static str],
    pub optional_fields: &'static [&'static str],
    pub image_slots: &'static [ImageSlot],
}

const SINGLE_IMAGE: &[ImageSlot] = &[slot("image")];
const FACE_SWAP_SLOTS: &[ImageSlot] = &[slot("source"), slot("target")];
const CHARACTER_SLOTS: &[ImageSlot] = &[slot("reference")];
const MERGE_SLOTS: &[ImageSlot] = &[slot("first"), slot("second")];
const AD_SLOTS: &[ImageSlot] = &[optional_slot("product")];
const THUMBNAIL_SLOTS: &[ImageSlot] =
    &[optional_slot("subject"), optional_slot("background")];

impl Tool {
    pub const ALL: [Tool; 14] = [
        Tool::Generate,
        Tool::Edit,
        Tool::Enhance,
        Tool::FaceSwap,
        Tool::BlurFaces,
        Tool::ChangeBackground,
        Tool::ConsistentCharacter,
        Tool::ArtisticEffect,
        Tool::Merge,
        Tool::Montage,
        Tool::Logo,
        Tool::BrandIdentity,
        Tool::AdPost,
        Tool::Thumbnail,
    ];

    pub fn descriptor(&self) -> ToolDescriptor {
        match self {
            Tool::Generate => ToolDescriptor {
                id: "generate",
                label: "Image Generator",
                model_label: None,
                required_fields: &["prompt"],
                optional_fields: &["aspect_ratio", "tier"],
                image_slots: &[],
            },
            Tool::Edit => ToolDescriptor {
                id: "edit",
                label: "Image Editor",
                model_label: Some("Edit"),
                required_fields: &["instruction"],
                optional_fields: &[],
                image_slots: SINGLE_IMAGE,
            },
            Tool::Enhance => ToolDescriptor {
                id: "enhance",
                label: "Image Enhancer",
                model_label: Some("Enhance"),
                required_fields: &[],
                optional_fields: &[],
                image_slots: SINGLE_IMAGE,
            },
            Tool::FaceSwap => ToolDescriptor {
                id: "face-swap",
                label: "Face Swap",
                model_label: Some("FaceSwap"),
                required_fields: &[],
                optional_fields: &[],
                image_slots: FACE_SWAP_SLOTS,
            },
            Tool::BlurFaces => ToolDescriptor {
                id: "blur-face",
                label: "Face Blur",
                model_label: Some("FaceBlur"),
                required_fields: &[],
                optional_fields: &[],
                image_slots: SINGLE_IMAGE,
            },
            Tool::ChangeBackground => ToolDescriptor {
                id: "change-bg",
                label: "Background Changer",
                model_label: Some("Background"),
                required_fields: &["background"],
                optional_fields: &[],
                image_slots: SINGLE_IMAGE,
            },
            Tool::ConsistentCharacter => ToolDescriptor {
                id: "consistent-char",
                label: "Consistent Character",
                model_label: Some("Character"),
                required_fields: &["scenario"],
                optional_fields: &[],
                image_slots: CHARACTER_SLOTS,
            },
            Tool::ArtisticEffect => ToolDescriptor {
                id: "effects",
                label: "Artistic Effects",
                model_label: Some("Style"),
                required_fields: &["style"],
                optional_fields: &[],
                image_slots: SINGLE_IMAGE,
            },
            Tool::Merge => ToolDescriptor {
                id: "merge",
                label: "Image Merger",
                model_label: Some("Merge"),
                required_fields: &[],
                optional_fields: &["instruction"],
                image_slots: MERGE_SLOTS,
            },
            Tool::Montage => ToolDescriptor {
                id: "montage",
                label: "Photo Montage",
                model_label: Some("Montage"),
                required_fields: &["style"],
                optional_fields: &[],
                image_slots: &[ImageSlot {
                    name: "images",
                    required: true,
                    repeated: true,
                }],
            },
            Tool::Logo => ToolDescriptor {
                id: "logo",
                label: "Logo Maker",
                model_label: Some("Logo"),
                required_fields: &["brand_name"],
                optional_fields: &["industry", "style", "colors"],
                image_slots: &[],
            },
            Tool::BrandIdentity => ToolDescriptor {
                id: "brand-identity",
                label: "Brand Identity",
                model_label: Some("BrandKit"),
                required_fields: &["brand_name", "description"],
                optional_fields: &["theme", "colors"],
                image_slots: &[],
            },
            Tool::AdPost => ToolDescriptor {
                id: "ads",
                label: "Ad Generator",
                model_label: Some("Ads"),
                required_fields: &["product_name", "description"],
                optional_fields: &["platform", "ad_type", "style", "price", "cta", "mood"],
                image_slots: AD_SLOTS,
            },
            Tool::Thumbnail => ToolDescriptor {
                id: "thumbnail",
                label: "YouTube Thumbnail",
                model_label: Some("Thumbnail"),
                required_fields: &["title"],
                optional_fields: &[],
                image_slots: THUMBNAIL_SLOTS,
            },
        }
    }

    pub fn id(&self) -> &'static str {
        self.descriptor().id
    }

    pub fn from_id(id: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Gallery model tag for a result produced by `model`.
    pub fn model_tag(&self, model: &str) -> String {
        match self.descriptor().model_label {
            Some(label) => format!("{} ({})", model, label),
            None => model.to_string(),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_and_resolve() {
        let ids: HashSet<&str> = Tool::ALL.iter().map(|t| t.id()).collect();
        assert_eq!(ids.len(), Tool::ALL.len());
        for tool in Tool::ALL {
            assert_eq!(Tool::from_id(tool.id()), Some(tool));
        }
        assert_eq!(Tool::from_id("remove-bg"), None);
    }

    #[test]
    fn test_serialized_name_is_id() {
        for tool in Tool::ALL {
            let json = serde_json::to_string(&tool).unwrap();
            assert_eq!(json, format!("\"{}\"", tool.id()));
        }
    }

    #[test]
    fn test_slot_tables_outlive_descriptor() {
        let tables: Vec<&'static [ImageSlot]> =
            Tool::ALL.iter().map(|t| t.descriptor().image_slots).collect();
        let names: Vec<&str> = tables[Tool::ALL.len() - 1]
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["subject", "background"]);
        assert!(tables[Tool::ALL.len() - 2].iter().all(|s| !s.required));
        assert_eq!(Tool::Merge.descriptor().image_slots, MERGE_SLOTS);
        assert_eq!(Tool::ConsistentCharacter.descriptor().image_slots[0].name, "reference");
    }

    #[test]
    fn test_slot_names_unique_per_tool() {
        for tool in Tool::ALL {
            let slots = tool.descriptor().image_slots;
            let names: HashSet<&str> = slots.iter().map(|s| s.name).collect();
            assert_eq!(names.len(), slots.len(), "{}", tool.id());
        }
    }

    #[test]
    fn test_face_swap_declares_source_before_target() {
        let names: Vec<&str> = Tool::FaceSwap
            .descriptor()
            .image_slots
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["source", "target"]);
    }

    #[test]
    fn test_model_tag() {
        assert_eq!(
            Tool::FaceSwap.model_tag("gemini-2.5-flash-image"),
            "gemini-2.5-flash-image (FaceSwap)"
        );
        assert_eq!(
            Tool::Generate.model_tag("gemini-3-pro-image-preview"),
            "gemini-3-pro-image-preview"
        );
    }
}
