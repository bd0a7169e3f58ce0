pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Image formats recognised from file headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageFormat {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
            [0x89, b'P', b'N', b'G', ..] => Some(ImageFormat::Png),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => {
                Some(ImageFormat::Webp)
            }
            [b'G', b'I', b'F', b'8', ..] => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::Webp),
            "image/gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
            ImageFormat::Gif => "gif",
        }
    }
}

/// MIME type for raw image bytes; unknown headers are treated as PNG.
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match ImageFormat::sniff(bytes) {
        Some(format) => format.mime_type(),
        None => {
            tracing::warn!(
                "Unrecognized image header {:02X?}, assuming {}",
                &bytes[..bytes.len().min(4)],
                DEFAULT_IMAGE_MIME
            );
            DEFAULT_IMAGE_MIME
        }
    }
}

/// File extension used when exporting an image of the given MIME type.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    ImageFormat::from_mime(mime_type)
        .unwrap_or(ImageFormat::Png)
        .extension()
}
