//! Session state: the active panel, the image gallery and the chat transcript.
//!
//! Everything here lives in memory for one session. The only way out is
//! [`GeneratedImageRecord::export_to`], which writes a record's image to disk.

use crate::ai::mime::extension_for_mime;
use crate::ai::EncodedImage;
use crate::catalog::Tool;
use crate::chat::ChatTranscript;
use crate::models::{AspectRatio, GeneratedImageRecord};
use crate::request::GenerationRequest;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

impl GeneratedImageRecord {
    /// File name used on export: `<tool-id>-<unix millis>-<id prefix>.<ext>`.
    pub fn file_name(&self) -> Result<String> {
        let image = EncodedImage::from_data_url(&self.url)?;
        let id = self.id.simple().to_string();
        Ok(format!(
            "{}-{}-{}.{}",
            self.tool.id(),
            self.created_at.timestamp_millis(),
            &id[..8],
            extension_for_mime(image.mime_type())
        ))
    }

    /// Decode the image and write it into `dir`, creating the directory if
    /// needed. Returns the written path.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        let image = EncodedImage::from_data_url(&self.url)?;
        let bytes = image.to_bytes()?;

        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name()?);
        fs::write(&path, &bytes)?;

        info!("Exported {} ({} bytes) to {:?}", self.id, bytes.len(), path);
        Ok(path)
    }
}

/// Generated images for the session, newest first.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    records: Vec<GeneratedImageRecord>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: GeneratedImageRecord) -> &GeneratedImageRecord {
        self.records.insert(0, record);
        &self.records[0]
    }

    /// Remove the record with `id`. The remaining records keep their order.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    pub fn get(&self, id: Uuid) -> Option<&GeneratedImageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedImageRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[GeneratedImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Home,
    ToolsHub,
    Gallery,
    Chat,
    Settings,
    Tool(Tool),
}

#[derive(Debug, Clone, Default)]
pub struct Studio {
    pub active_panel: Panel,
    pub gallery: Gallery,
    pub transcript: ChatTranscript,
}

impl Studio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, panel: Panel) {
        self.active_panel = panel;
    }

    /// Add a successful result to the gallery. Tools that do not fix an
    /// output ratio are recorded as square.
    pub fn record_generation(
        &mut self,
        request: &GenerationRequest,
        url: String,
        model: &str,
    ) -> &GeneratedImageRecord {
        let tool = request.tool();
        let record = GeneratedImageRecord::new(
            tool,
            url,
            request.summary(),
            request.aspect_ratio().unwrap_or(AspectRatio::Square),
            tool.model_tag(model),
        );
        self.gallery.add(record)
    }
}
