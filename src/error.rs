//! Error handling and custom error types
//!
//! Every failure a tool can hit (bad upload, transport, or an unusable model
//! reply) surfaces as one of these variants, so callers only ever need to
//! show a single message.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed image input: {0}")]
    MalformedImageInput(String),

    #[error("Missing reference image: {0}")]
    MissingReferenceImage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No data received from the model")]
    EmptyResponse,

    /// The model answered with text instead of an image; the message is that
    /// text, unchanged.
    #[error("{0}")]
    ModelRefusal(String),

    #[error("No image found in the model response")]
    NoImageProduced,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures of the network call itself rather than of the reply.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
