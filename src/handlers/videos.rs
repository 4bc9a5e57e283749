/// Video handlers
///
/// Blob/document write ordering minimizes orphan risk: blobs go up before
/// the row is created, and the row is removed before its blobs are deleted.
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::upload_staged;
use crate::middleware::AuthUser;
use crate::models::Video;
use crate::response::{ApiResponse, PageQuery, Pagination};
use crate::services::storage::BlobKind;
use crate::views::feeds;
use crate::AppState;

#[derive(Debug, MultipartForm)]
pub struct PublishVideoForm {
    pub title: Text<String>,
    pub description: Option<Text<String>>,
    /// Client-supplied fallback when the blob store cannot probe duration.
    pub duration: Option<Text<f64>>,
    #[multipart(rename = "videoFile")]
    pub video_file: Option<TempFile>,
    pub thumbnail: Option<TempFile>,
}

#[derive(Debug, MultipartForm)]
pub struct UpdateVideoForm {
    pub title: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub thumbnail: Option<TempFile>,
}

async fn owned_video(state: &AppState, video_id: Uuid, owner: Uuid) -> Result<Video> {
    let video = db::videos::find_by_id(&state.db, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.owner_id != owner {
        return Err(AppError::Forbidden(
            "You do not own this video".to_string(),
        ));
    }

    Ok(video)
}

/// `GET /videos`: published videos feed.
pub async fn list_videos(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let pg = Pagination::from_query(&query);
    let videos = feeds::published_videos(&state.db, pg).await?;
    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

/// `POST /videos` (multipart): publish a new video.
pub async fn publish_video(
    state: web::Data<AppState>,
    user: AuthUser,
    form: MultipartForm<PublishVideoForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let title = form.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }

    let video_file = form
        .video_file
        .as_ref()
        .ok_or_else(|| AppError::Validation("Video file is required".to_string()))?;
    let thumbnail = form
        .thumbnail
        .as_ref()
        .ok_or_else(|| AppError::Validation("Thumbnail is required".to_string()))?;

    let video_blob = upload_staged(state.blobs.as_ref(), video_file, BlobKind::Video).await?;

    let thumbnail_blob =
        match upload_staged(state.blobs.as_ref(), thumbnail, BlobKind::Image).await {
            Ok(blob) => blob,
            Err(err) => {
                // Roll back the half-finished upload pair as far as possible.
                if let Err(cleanup) = state.blobs.delete(&video_blob.url, BlobKind::Video).await {
                    tracing::warn!(error = %cleanup, "Failed to clean up video blob after thumbnail failure");
                }
                return Err(err);
            }
        };

    let duration = video_blob
        .duration
        .or(form.duration.map(|d| d.0))
        .unwrap_or(0.0);

    let video = db::videos::insert(
        &state.db,
        db::videos::NewVideo {
            owner_id: user.0,
            video_url: &video_blob.url,
            thumbnail_url: &thumbnail_blob.url,
            title: &title,
            description: form.description.as_deref().map(|d| d.trim()).unwrap_or(""),
            duration,
        },
    )
    .await?;

    tracing::info!(video_id = %video.id, owner_id = %user.0, "Video published");
    Ok(ApiResponse::created(video, "Video uploaded successfully"))
}

/// Store operations behind a single watched-video fetch.
#[async_trait]
trait WatchStore {
    async fn video_exists(&self, video_id: Uuid) -> Result<bool>;
    async fn increment_views(&self, video_id: Uuid) -> Result<()>;
    async fn find_video(&self, video_id: Uuid) -> Result<Option<Video>>;
    async fn record_watch(&self, user_id: Uuid, video_id: Uuid) -> Result<()>;
}

#[async_trait]
impl WatchStore for AppState {
    async fn video_exists(&self, video_id: Uuid) -> Result<bool> {
        db::videos::exists(&self.db, video_id).await
    }

    async fn increment_views(&self, video_id: Uuid) -> Result<()> {
        db::videos::increment_views(&self.db, video_id).await
    }

    async fn find_video(&self, video_id: Uuid) -> Result<Option<Video>> {
        db::videos::find_by_id(&self.db, video_id).await
    }

    async fn record_watch(&self, user_id: Uuid, video_id: Uuid) -> Result<()> {
        db::users::record_watch(&self.db, user_id, video_id).await
    }
}

/// A missing id must short-circuit before the view counter or the history
/// table is touched.
async fn watch_video<S>(store: &S, viewer: Uuid, video_id: Uuid) -> Result<Video>
where
    S: WatchStore + Sync,
{
    if !store.video_exists(video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    store.increment_views(video_id).await?;
    let video = store
        .find_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    store.record_watch(viewer, video_id).await?;
    Ok(video)
}

/// `GET /videos/{videoId}`: fetch one video, bump views, record the watch.
pub async fn get_video(
    state: web::Data<AppState>,
    user: AuthUser,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video = watch_video(state.get_ref(), user.0, video_id.into_inner()).await?;
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

/// `PATCH /videos/{videoId}` (multipart): update metadata and optionally
/// replace the thumbnail.
pub async fn update_video(
    state: web::Data<AppState>,
    user: AuthUser,
    video_id: web::Path<Uuid>,
    form: MultipartForm<UpdateVideoForm>,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();
    let form = form.into_inner();

    let existing = owned_video(&state, video_id, user.0).await?;

    let title = form.title.as_deref().map(|t| t.trim());
    let description = form.description.as_deref().map(|d| d.trim());
    if title == Some("") || description == Some("") {
        return Err(AppError::Validation(
            "Title and description must not be blank".to_string(),
        ));
    }

    let new_thumbnail = match form.thumbnail.as_ref() {
        Some(file) => Some(upload_staged(state.blobs.as_ref(), file, BlobKind::Image).await?),
        None => None,
    };

    let updated = db::videos::update_metadata(
        &state.db,
        video_id,
        title,
        description,
        new_thumbnail.as_ref().map(|b| b.url.as_str()),
    )
    .await?;

    if new_thumbnail.is_some() {
        if let Err(err) = state
            .blobs
            .delete(&existing.thumbnail_url, BlobKind::Image)
            .await
        {
            tracing::warn!(error = %err, "Failed to delete replaced thumbnail blob");
        }
    }

    Ok(ApiResponse::ok(updated, "Video updated successfully"))
}

/// `DELETE /videos/{videoId}`: remove the row first, then both blobs, so a
/// failed blob delete never leaves an orphaned referenced document.
pub async fn delete_video(
    state: web::Data<AppState>,
    user: AuthUser,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();
    let video = owned_video(&state, video_id, user.0).await?;

    if !db::videos::delete(&state.db, video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let mut blob_failure = None;
    if let Err(err) = state.blobs.delete(&video.video_url, BlobKind::Video).await {
        blob_failure = Some(err);
    }
    if let Err(err) = state.blobs.delete(&video.thumbnail_url, BlobKind::Image).await {
        blob_failure.get_or_insert(err);
    }

    if let Some(err) = blob_failure {
        tracing::error!(video_id = %video_id, error = %err, "Video row deleted but blob cleanup failed");
        return Err(AppError::Internal(
            "Video deleted but media cleanup failed".to_string(),
        ));
    }

    tracing::info!(video_id = %video_id, "Video deleted");
    Ok(ApiResponse::ok(json!({}), "Video deleted successfully"))
}

/// `PATCH /videos/toggle-publish/{videoId}`
pub async fn toggle_publish(
    state: web::Data<AppState>,
    user: AuthUser,
    video_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = video_id.into_inner();
    owned_video(&state, video_id, user.0).await?;

    let video = db::videos::toggle_publish(&state.db, video_id).await?;
    Ok(ApiResponse::ok(video, "Publish status toggled successfully"))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    struct StubStore {
        present: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl StubStore {
        fn new(present: bool) -> Self {
            Self {
                present,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn sample_video(&self) -> Video {
            Video {
                id: Uuid::new_v4(),
                owner_id: Uuid::new_v4(),
                video_url: "https://cdn/v.mp4".into(),
                thumbnail_url: "https://cdn/t.png".into(),
                title: "clip".into(),
                description: String::new(),
                duration: 12.5,
                views: 1,
                is_published: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl WatchStore for StubStore {
        async fn video_exists(&self, _video_id: Uuid) -> Result<bool> {
            self.record("exists");
            Ok(self.present)
        }

        async fn increment_views(&self, _video_id: Uuid) -> Result<()> {
            self.record("increment");
            Ok(())
        }

        async fn find_video(&self, _video_id: Uuid) -> Result<Option<Video>> {
            self.record("find");
            Ok(self.present.then(|| self.sample_video()))
        }

        async fn record_watch(&self, _user_id: Uuid, _video_id: Uuid) -> Result<()> {
            self.record("record");
            Ok(())
        }
    }

    #[tokio::test]
    async fn missing_video_short_circuits_before_any_write() {
        let store = StubStore::new(false);
        let err = watch_video(&store, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(*store.calls.lock().unwrap(), vec!["exists"]);
    }

    #[tokio::test]
    async fn watch_bumps_views_then_records_history() {
        let store = StubStore::new(true);
        watch_video(&store, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(
            *store.calls.lock().unwrap(),
            vec!["exists", "increment", "find", "record"]
        );
    }
}
