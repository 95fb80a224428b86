use crate::core::error::UploadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Accepted types for the knowledge base picker
pub const KNOWLEDGE_BASE_ACCEPT: &str = ".txt,.pdf,.doc,.docx";

/// Reference to a file stored by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub reference: String,
    pub mime_type: String,
    pub display_name: String,
}

/// A file read from disk, ready to be uploaded.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Loads the file and guesses its MIME type from the extension.
    pub async fn read(path: &Path) -> Result<Self, UploadError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            name,
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The three attachment triggers of the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Document,
    Video,
}

impl AttachmentKind {
    pub fn accept(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image/*",
            AttachmentKind::Document => ".pdf,.doc,.docx",
            AttachmentKind::Video => "video/*",
        }
    }

    pub fn check(&self, file: &LocalFile) -> Result<(), UploadError> {
        check_accept(self.accept(), file)
    }

    /// Picks the trigger a file given on the command line goes through.
    pub fn for_path(path: &Path) -> Self {
        let guess = mime_guess::from_path(path).first();
        match guess.as_ref().map(|m| m.type_().as_str()) {
            Some("image") => AttachmentKind::Image,
            Some("video") => AttachmentKind::Video,
            _ => AttachmentKind::Document,
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Document => "document",
            AttachmentKind::Video => "video",
        };
        f.write_str(name)
    }
}

/// Matches a file against an `accept`-style filter: comma separated
/// extensions (`.pdf`), exact MIME types, or `type/*` wildcards.
pub fn matches_accept(accept: &str, file_name: &str, mime_type: &str) -> bool {
    let file_name = file_name.to_ascii_lowercase();
    let mime_type = mime_type.to_ascii_lowercase();

    accept
        .split(',')
        .map(|entry| entry.trim().to_ascii_lowercase())
        .filter(|entry| !entry.is_empty())
        .any(|entry| {
            if entry.starts_with('.') {
                file_name.ends_with(&entry)
            } else if let Some(major) = entry.strip_suffix("/*") {
                mime_type
                    .split_once('/')
                    .is_some_and(|(file_major, _)| file_major == major)
            } else {
                mime_type == entry
            }
        })
}

pub fn check_accept(accept: &'static str, file: &LocalFile) -> Result<(), UploadError> {
    if matches_accept(accept, &file.name, &file.mime_type) {
        Ok(())
    } else {
        Err(UploadError::Rejected {
            file: file.name.clone(),
            mime_type: file.mime_type.clone(),
            accept,
        })
    }
}
