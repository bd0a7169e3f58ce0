//! Data models and structures
//!
//! Aspect ratios, model tiers, gallery records and environment configuration.

use crate::catalog::Tool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    /// Also stands in for 9:16 story layouts.
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "4:3")]
    Wide,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Wide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Wide => "4:3",
        }
    }

    /// Map an advertising platform label (e.g. `"Stories (9:16)"`) to the
    /// nearest supported ratio.
    pub fn for_platform(platform: &str) -> Self {
        let platform = platform.to_lowercase();
        let portrait = ["9:16", "story", "stories", "reel", "vertical", "portrait"];
        let landscape = ["16:9", "landscape", "wide", "linkedin", "twitter"];

        if portrait.iter().any(|p| platform.contains(p)) {
            AspectRatio::Portrait
        } else if landscape.iter().any(|p| platform.contains(p)) {
            AspectRatio::Landscape
        } else {
            AspectRatio::Square
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| {
                crate::Error::Config(format!(
                    "Unknown aspect ratio '{}'. Expected one of 1:1, 3:4, 16:9, 4:3",
                    s
                ))
            })
    }
}

/// Which image model a text-to-image request runs on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    #[default]
    Fast,
    Hd,
}

/// One image in the session gallery. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedImageRecord {
    pub id: Uuid,
    pub tool: Tool,
    /// Displayable data URL.
    pub url: String,
    pub prompt_summary: String,
    pub aspect_ratio: AspectRatio,
    pub created_at: DateTime<Utc>,
    pub model_tag: String,
}

impl GeneratedImageRecord {
    pub fn new(
        tool: Tool,
        url: String,
        prompt_summary: String,
        aspect_ratio: AspectRatio,
        model_tag: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool,
            url,
            prompt_summary,
            aspect_ratio,
            created_at: Utc::now(),
            model_tag,
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub image_model: String,
    pub hd_image_model: String,
    pub chat_model: String,
    pub request_timeout: Option<Duration>,
    pub output_dir: PathBuf,
}

pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_HD_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-flash-preview";

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    crate::Error::Config(format!(
                        "REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            gemini_api_key: get("GEMINI_API_KEY")
                .ok_or_else(|| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?,
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| crate::ai::gemini::client::DEFAULT_BASE_URL.to_string()),
            image_model: get("IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            hd_image_model: get("HD_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_HD_IMAGE_MODEL.to_string()),
            chat_model: get("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            request_timeout,
            output_dir: PathBuf::from(get("OUTPUT_DIR").unwrap_or_else(|| "output".to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_aspect_ratio_serialization() {
        let json = serde_json::to_string(&AspectRatio::Landscape).unwrap();
        assert_eq!(json, "\"16:9\"");
        let parsed: AspectRatio = serde_json::from_str("\"3:4\"").unwrap();
        assert_eq!(parsed, AspectRatio::Portrait);
    }

    #[test]
    fn test_aspect_ratio_from_str() {
        assert_eq!("4:3".parse::<AspectRatio>().unwrap(), AspectRatio::Wide);
        assert!("9:16".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_platform_mapping() {
        assert_eq!(
            AspectRatio::for_platform("Instagram Feed (1:1)"),
            AspectRatio::Square
        );
        assert_eq!(
            AspectRatio::for_platform("Stories (9:16)"),
            AspectRatio::Portrait
        );
        assert_eq!(
            AspectRatio::for_platform("LinkedIn/Twitter (16:9)"),
            AspectRatio::Landscape
        );
        assert_eq!(AspectRatio::for_platform("Facebook Post"), AspectRatio::Square);
        assert_eq!(AspectRatio::for_platform("Instagram"), AspectRatio::Square);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.gemini_api_key, "k");
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.hd_image_model, DEFAULT_HD_IMAGE_MODEL);
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_config_parses_timeout() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("REQUEST_TIMEOUT_SECS", "90"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(90)));

        let err = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_record_serialization() {
        let record = GeneratedImageRecord::new(
            Tool::Logo,
            "data:image/png;base64,AAAA".to_string(),
            "Logo: LUMIX".to_string(),
            AspectRatio::Square,
            "gemini-2.5-flash-image (Logo)".to_string(),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"aspect_ratio\":\"1:1\""));
        assert!(json.contains("\"tool\":\"logo\""));
        let back: GeneratedImageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
