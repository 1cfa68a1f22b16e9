// Reference images: upload, validate, encode
// Author: kelexine (https://github.com/kelexine)

use super::models::{encode_base64, mime_for_extension, ImageFormat};
use crate::error::AppError;
use crate::validation::validate_file;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

/// Maximum number of reference images attached to one request.
pub const MAX_REFERENCE_IMAGES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A user-supplied image that steers the generated output.
///
/// Bytes stay where they are (on disk or in memory) until [`encode`] is
/// called, so an upload that disappears in between surfaces as a file error.
///
/// [`encode`]: ReferenceImage::encode
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    name: String,
    mime_type: String,
    size_bytes: u64,
    source: Source,
}

impl ReferenceImage {
    /// Wrap in-memory bytes with the MIME type the uploader declared.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            source: Source::Memory(bytes),
        }
    }

    /// Stat a file on disk and work out its MIME type.
    ///
    /// The extension decides the type; files without a known extension are
    /// sniffed by their magic bytes.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            AppError::file("Failed to read file").with_details(format!("{}: {}", name, e))
        })?;

        let mime_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension)
        {
            Some(mime) => mime.to_string(),
            None => sniff_file(path).await.unwrap_or("application/octet-stream").to_string(),
        };

        Ok(Self {
            name,
            mime_type,
            size_bytes: metadata.len(),
            source: Source::Path(path.to_path_buf()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_file(self.size_bytes, &self.mime_type)
    }

    /// Read the image and return its base64 payload (no data-URI header).
    pub async fn encode(&self) -> Result<String, AppError> {
        match &self.source {
            Source::Memory(bytes) => Ok(encode_base64(bytes)),
            Source::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    AppError::file("Failed to process reference image")
                        .with_details(format!("{}: {}", self.name, e))
                })?;
                Ok(encode_base64(&bytes))
            }
        }
    }
}

async fn sniff_file(path: &Path) -> Option<&'static str> {
    let mut file = tokio::fs::File::open(path).await.ok()?;
    let mut header = [0u8; 16];
    let read = file.read(&mut header).await.ok()?;
    ImageFormat::detect(&header[..read]).map(|f| f.mime_type())
}

/// Ordered, bounded collection of reference images.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSet {
    images: Vec<ReferenceImage>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate each candidate on its own and keep the valid ones.
    ///
    /// Returns one `"<name>: <message>"` line per rejected file. Accepted
    /// images are appended in order, and the set is truncated to
    /// [`MAX_REFERENCE_IMAGES`].
    pub fn add(&mut self, candidates: impl IntoIterator<Item = ReferenceImage>) -> Vec<String> {
        let mut rejections = Vec::new();

        for image in candidates {
            match image.validate() {
                Ok(()) => self.images.push(image),
                Err(e) => {
                    warn!("Rejected reference image {}: {}", image.name, e);
                    rejections.push(format!("{}: {}", image.name, e.user_friendly_message()));
                }
            }
        }

        if self.images.len() > MAX_REFERENCE_IMAGES {
            debug!(
                "Dropping {} reference image(s) over the limit of {}",
                self.images.len() - MAX_REFERENCE_IMAGES,
                MAX_REFERENCE_IMAGES
            );
            self.images.truncate(MAX_REFERENCE_IMAGES);
        }

        rejections
    }

    /// Load files from disk, then [`add`](Self::add) them.
    pub async fn add_paths(&mut self, paths: &[PathBuf]) -> Vec<String> {
        let mut rejections = Vec::new();
        let mut loaded = Vec::with_capacity(paths.len());

        for path in paths {
            match ReferenceImage::from_path(path).await {
                Ok(image) => loaded.push(image),
                Err(e) => rejections.push(format!("{}: {}", path.display(), e.user_friendly_message())),
            }
        }

        rejections.extend(self.add(loaded));
        rejections
    }

    pub fn remove(&mut self, index: usize) -> Option<ReferenceImage> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceImage> {
        self.images.iter()
    }

    /// Encode every image one at a time, preserving order.
    ///
    /// The first failure aborts the whole batch.
    pub async fn encode_all(&self) -> Result<Vec<String>, AppError> {
        let mut encoded = Vec::with_capacity(self.images.len());
        for image in &self.images {
            encoded.push(image.encode().await?);
        }
        Ok(encoded)
    }
}
