pub mod comments;
pub mod dashboard;
pub mod healthcheck;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod users;
pub mod videos;

use actix_multipart::form::tempfile::TempFile;

use crate::error::Result;
use crate::services::storage::{BlobKind, BlobStore, UploadedBlob};

/// Push a staged multipart file into the blob store.
pub(crate) async fn upload_staged(
    blobs: &dyn BlobStore,
    file: &TempFile,
    kind: BlobKind,
) -> Result<UploadedBlob> {
    let file_name = file.file_name.as_deref().unwrap_or("upload.bin");
    blobs.upload(file.file.path(), file_name, kind).await
}
