//! Captioning provider trait for turning images into searchable text.
//!
//! A caption is meant to be embedded and stored as a
//! [`DocumentChunk`](crate::DocumentChunk) with
//! [`Modality::Image`](crate::Modality::Image).

use async_trait::async_trait;

use crate::error::ServiceError;

/// The instruction sent alongside every image.
pub const CAPTION_INSTRUCTION: &str =
    "Describe this image clearly in 2-3 sentences that are useful for search.";

/// A provider that describes an image in a few sentences of text.
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// Caption raw image bytes (PNG, JPEG, GIF or WebP).
    ///
    /// The returned text has no leading or trailing whitespace.
    async fn caption(&self, image: &[u8]) -> Result<String, ServiceError>;
}

/// Guess the MIME type of an image from its magic bytes.
///
/// Unrecognised data is reported as `image/png`.
pub fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}
