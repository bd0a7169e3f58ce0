//! Pixel Studio - a set of image tools and a design chat on top of Gemini
//!
//! Each tool turns a few text fields and reference images into one image
//! request; results land in an in-memory gallery for the session. A separate
//! chat session keeps a running conversation with a design-assistant persona.

pub mod ai;
pub mod app;
pub mod catalog;
pub mod chat;
pub mod client;
pub mod error;
pub mod models;
pub mod prompts;
pub mod request;
pub mod studio;

pub use error::{Error, Result};
