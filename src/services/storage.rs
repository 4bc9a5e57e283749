/// Blob store collaborator
///
/// The core only needs upload/delete-by-reference semantics; S3 is the
/// production implementation behind the `BlobStore` trait.
use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Hint for where a blob lives and how it should be keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Video,
    Image,
}

impl BlobKind {
    fn prefix(&self) -> &'static str {
        match self {
            BlobKind::Video => "videos",
            BlobKind::Image => "images",
        }
    }
}

/// A successfully stored blob. Duration is only known for stores that can
/// probe media metadata; callers must tolerate `None`.
#[derive(Debug, Clone)]
pub struct UploadedBlob {
    pub url: String,
    pub duration: Option<f64>,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload a local file, returning its public reference. `file_name` is
    /// the client-supplied name; it only contributes the extension (staged
    /// multipart files carry anonymous temp names).
    async fn upload(&self, local_path: &Path, file_name: &str, kind: BlobKind)
        -> Result<UploadedBlob>;

    /// Delete a previously uploaded blob by its public reference.
    async fn delete(&self, url: &str, kind: BlobKind) -> Result<()>;
}

pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        local_path: &Path,
        file_name: &str,
        kind: BlobKind,
    ) -> Result<UploadedBlob> {
        let key = object_key(kind, file_name);
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read upload: {e}")))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type_for(file_name))
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Blob upload failed: {e}")))?;

        tracing::info!(key = %key, "Blob uploaded");

        Ok(UploadedBlob {
            url: self.object_url(&key),
            duration: None,
        })
    }

    async fn delete(&self, url: &str, _kind: BlobKind) -> Result<()> {
        let key = key_from_url(url, &self.public_base_url).ok_or_else(|| {
            AppError::Internal(format!("Blob reference outside managed store: {url}"))
        })?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Blob delete failed: {e}")))?;

        tracing::info!(key = %key, "Blob deleted");
        Ok(())
    }
}

/// Build a collision-free object key, keeping the original extension.
fn object_key(kind: BlobKind, file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("{}/{}{}", kind.prefix(), Uuid::new_v4(), ext)
}

fn content_type_for(file_name: &str) -> &'static str {
    match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

fn key_from_url<'a>(url: &'a str, base: &str) -> Option<&'a str> {
    url.strip_prefix(base)
        .map(|rest| rest.trim_start_matches('/'))
        .filter(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_keys_keep_extension_and_prefix() {
        let key = object_key(BlobKind::Image, "upload.PNG");
        assert!(key.starts_with("images/"));
        assert!(key.ends_with(".png"));

        let key = object_key(BlobKind::Video, "clip.mp4");
        assert!(key.starts_with("videos/"));
        assert!(key.ends_with(".mp4"));

        let key = object_key(BlobKind::Image, "no-extension");
        assert!(!key.contains('.'));
    }

    #[test]
    fn key_extraction_requires_managed_base() {
        let base = "https://bucket.s3.us-east-1.amazonaws.com";
        assert_eq!(
            key_from_url("https://bucket.s3.us-east-1.amazonaws.com/images/a.png", base),
            Some("images/a.png")
        );
        assert_eq!(key_from_url("https://elsewhere.example.com/x.png", base), None);
        assert_eq!(key_from_url(base, base), None);
    }

    #[test]
    fn content_types_cover_media_extensions() {
        assert_eq!(content_type_for("a.mp4"), "video/mp4");
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }
}
