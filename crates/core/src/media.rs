//! Image blob persistence.
//!
//! Tour payloads embed images inline as `data:image/<fmt>;base64,` URIs.
//! [`MediaStore`] decodes them, verifies the bytes really are an image, and
//! writes each one under its root directory with a fresh UUID filename that
//! preserves the declared extension. Callers get back the public URL for
//! every stored blob.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures::future::try_join_all;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for image persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The payload does not carry the `data:image/<fmt>;base64,` marker.
    #[error("payload is not a base64-encoded image data URI")]
    InvalidFormat,

    /// The decoded bytes are not a recognizable image format.
    #[error("payload does not decode to a recognizable image")]
    UnrecognizedImage,

    /// The base64 payload could not be decoded.
    #[error("base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The blob could not be written to durable storage.
    #[error("I/O error writing image blob: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// MediaStore
// ---------------------------------------------------------------------------

/// URLs of a persisted image batch, gallery order matching the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImages {
    pub main_url: Option<String>,
    pub gallery_urls: Vec<String>,
}

/// Writes inline image payloads to a directory of durable blobs and maps
/// each one to a public URL under a fixed prefix.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    url_prefix: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }

    /// Directory the blobs are written to (served statically by the API).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode and persist a single data-URI payload, returning its URL.
    pub async fn save_data_uri(&self, payload: &str) -> Result<String, MediaError> {
        let (extension, bytes) = decode_data_uri(payload)?;

        // The declared subtype is caller-controlled; trust the magic bytes.
        if image::guess_format(&bytes).is_err() {
            return Err(MediaError::UnrecognizedImage);
        }

        tokio::fs::create_dir_all(&self.root).await?;
        let filename = format!("{}.{extension}", Uuid::new_v4());
        tokio::fs::write(self.root.join(&filename), &bytes).await?;

        Ok(format!("{}/{filename}", self.url_prefix))
    }

    /// Persist an optional main image plus a gallery batch.
    ///
    /// Gallery URLs come back in input order. Any single failure aborts the
    /// whole call with one aggregate error; no partial result is returned.
    pub async fn save_images(
        &self,
        main: Option<&str>,
        gallery: &[String],
    ) -> Result<SavedImages, MediaError> {
        let main_url = match main {
            Some(payload) => Some(self.save_data_uri(payload).await?),
            None => None,
        };

        let gallery_urls =
            try_join_all(gallery.iter().map(|payload| self.save_data_uri(payload))).await?;

        Ok(SavedImages {
            main_url,
            gallery_urls,
        })
    }
}

/// Split a `data:image/<fmt>;base64,<payload>` string into the declared
/// extension and the decoded bytes.
fn decode_data_uri(payload: &str) -> Result<(String, Vec<u8>), MediaError> {
    let rest = payload
        .strip_prefix("data:image/")
        .ok_or(MediaError::InvalidFormat)?;
    let (subtype, data) = rest.split_once(";base64,").ok_or(MediaError::InvalidFormat)?;

    if subtype.is_empty() || !subtype.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(MediaError::InvalidFormat);
    }

    let bytes = BASE64.decode(data)?;
    Ok((subtype.to_ascii_lowercase(), bytes))
}
