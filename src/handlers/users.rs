/// User account and session handlers
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::upload_staged;
use crate::middleware::AuthUser;
use crate::models::user::{
    ChangePasswordRequest, LoginRequest, RefreshRequest, UpdateAccountRequest,
};
use crate::response::{ApiResponse, PageQuery, Pagination};
use crate::security::jwt::TokenPair;
use crate::security::password;
use crate::services::storage::BlobKind;
use crate::views::feeds;
use crate::AppState;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Debug, MultipartForm)]
pub struct RegisterForm {
    pub fullname: Text<String>,
    pub email: Text<String>,
    pub username: Text<String>,
    pub password: Text<String>,
    pub avatar: Option<TempFile>,
    #[multipart(rename = "coverImage")]
    pub cover_image: Option<TempFile>,
}

#[derive(Debug, MultipartForm)]
pub struct AvatarForm {
    pub avatar: Option<TempFile>,
}

#[derive(Debug, MultipartForm)]
pub struct CoverImageForm {
    #[multipart(rename = "coverImage")]
    pub cover_image: Option<TempFile>,
}

fn session_cookie(name: &'static str, value: &str) -> Cookie<'static> {
    Cookie::build(name, value.to_owned())
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .finish()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = session_cookie(name, "");
    cookie.make_removal();
    cookie
}

/// `POST /users/register` (multipart; avatar required, coverImage optional)
pub async fn register(
    state: web::Data<AppState>,
    form: MultipartForm<RegisterForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let fullname = form.fullname.trim().to_string();
    let email = form.email.trim().to_string();
    let username = form.username.trim().to_string();
    let password = form.password.0;

    if [&fullname, &email, &username, &password]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    if db::users::identifier_taken(&state.db, &username, &email).await? {
        return Err(AppError::Conflict(
            "User with email or username already exists".to_string(),
        ));
    }

    let avatar = form
        .avatar
        .as_ref()
        .ok_or_else(|| AppError::Validation("Avatar is required".to_string()))?;
    let avatar_blob = upload_staged(state.blobs.as_ref(), avatar, BlobKind::Image).await?;

    // Cover image is optional and its upload failure is tolerated.
    let cover_image_url = match form.cover_image.as_ref() {
        Some(file) => match upload_staged(state.blobs.as_ref(), file, BlobKind::Image).await {
            Ok(blob) => Some(blob.url),
            Err(err) => {
                tracing::warn!(error = %err, "Cover image upload failed; registering without it");
                None
            }
        },
        None => None,
    };

    let password_hash = password::hash_password(&password)?;
    let user = db::users::create_user(
        &state.db,
        db::users::NewUser {
            username: &username,
            email: &email,
            full_name: &fullname,
            password_hash: &password_hash,
            avatar_url: &avatar_blob.url,
            cover_image_url: cover_image_url.as_deref(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok(ApiResponse::created(user, "User registered successfully"))
}

/// `POST /users/login`
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload
        .validate()
        .map_err(|_| AppError::Validation("Identifier and password are required".to_string()))?;

    let (user, pair) = state.auth.login(&payload.identifier, &payload.password).await?;

    let body = ApiResponse::new(
        200,
        json!({
            "user": user,
            "accessToken": pair.access_token,
            "refreshToken": pair.refresh_token,
        }),
        "User logged in successfully",
    );

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(ACCESS_COOKIE, &pair.access_token))
        .cookie(session_cookie(REFRESH_COOKIE, &pair.refresh_token))
        .json(body))
}

/// `POST /users/logout`
pub async fn logout(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    state.auth.logout(user.0).await?;

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(ACCESS_COOKIE))
        .cookie(removal_cookie(REFRESH_COOKIE))
        .json(ApiResponse::new(200, json!({}), "User logged out successfully")))
}

/// `POST /users/refresh-token`
///
/// The incoming refresh token is read from the cookie or, for non-browser
/// clients, the JSON body.
pub async fn refresh_token(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Option<web::Json<RefreshRequest>>,
) -> Result<HttpResponse> {
    let incoming = req
        .cookie(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| payload.and_then(|p| p.into_inner().refresh_token))
        .ok_or_else(|| AppError::Unauthorized("Refresh token is required".to_string()))?;

    let pair: TokenPair = state.auth.refresh(&incoming).await?;

    let body = ApiResponse::new(
        200,
        json!({
            "accessToken": pair.access_token,
            "refreshToken": pair.refresh_token,
        }),
        "Access token refreshed",
    );

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(ACCESS_COOKIE, &pair.access_token))
        .cookie(session_cookie(REFRESH_COOKIE, &pair.refresh_token))
        .json(body))
}

/// `POST /users/change-password`
pub async fn change_password(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    payload
        .validate()
        .map_err(|_| AppError::Validation("Old and new passwords are required".to_string()))?;

    let current = db::users::find_by_id(&state.db, user.0)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    if !password::verify_password(&payload.old_password, &current.password_hash)? {
        return Err(AppError::Validation("Old password is incorrect".to_string()));
    }

    let new_hash = password::hash_password(&payload.new_password)?;
    db::users::update_password(&state.db, user.0, &new_hash).await?;

    tracing::info!(user_id = %user.0, "Password changed");
    Ok(ApiResponse::ok(json!({}), "Password changed successfully"))
}

/// `GET /users/current-user`
pub async fn current_user(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    let user = db::users::find_by_id(&state.db, user.0)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    Ok(ApiResponse::ok(user, "Current user fetched successfully"))
}

/// `PATCH /users/update-account`
pub async fn update_account(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse> {
    let full_name = payload.full_name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let email = payload.email.as_deref().map(str::trim).filter(|s| !s.is_empty());

    if full_name.is_none() && email.is_none() {
        return Err(AppError::Validation(
            "At least one of fullName or email is required".to_string(),
        ));
    }

    let updated = db::users::update_account(&state.db, user.0, full_name, email).await?;
    Ok(ApiResponse::ok(updated, "Account updated successfully"))
}

/// `PATCH /users/avatar` (multipart)
pub async fn update_avatar(
    state: web::Data<AppState>,
    user: AuthUser,
    form: MultipartForm<AvatarForm>,
) -> Result<HttpResponse> {
    let file = form
        .avatar
        .as_ref()
        .ok_or_else(|| AppError::Validation("Avatar file is required".to_string()))?;

    let blob = upload_staged(state.blobs.as_ref(), file, BlobKind::Image).await?;
    let old_url = db::users::update_avatar(&state.db, user.0, &blob.url).await?;

    // New blob and row are in place; losing the old blob is the least
    // destructive failure, so it is only logged.
    if let Err(err) = state.blobs.delete(&old_url, BlobKind::Image).await {
        tracing::warn!(error = %err, "Failed to delete replaced avatar blob");
    }

    let user = db::users::find_by_id(&state.db, user.0)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;
    Ok(ApiResponse::ok(user, "Avatar updated successfully"))
}

/// `PATCH /users/cover-image` (multipart)
pub async fn update_cover_image(
    state: web::Data<AppState>,
    user: AuthUser,
    form: MultipartForm<CoverImageForm>,
) -> Result<HttpResponse> {
    let file = form
        .cover_image
        .as_ref()
        .ok_or_else(|| AppError::Validation("Cover image file is required".to_string()))?;

    let blob = upload_staged(state.blobs.as_ref(), file, BlobKind::Image).await?;
    let old_url = db::users::update_cover_image(&state.db, user.0, &blob.url).await?;

    if let Some(old_url) = old_url {
        if let Err(err) = state.blobs.delete(&old_url, BlobKind::Image).await {
            tracing::warn!(error = %err, "Failed to delete replaced cover image blob");
        }
    }

    let user = db::users::find_by_id(&state.db, user.0)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;
    Ok(ApiResponse::ok(user, "Cover image updated successfully"))
}

/// `GET /users/c/{username}`: channel profile with subscription counts.
pub async fn channel_profile(
    state: web::Data<AppState>,
    user: AuthUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let username = username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }

    let profile = feeds::channel_profile(&state.db, &username, user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

    Ok(ApiResponse::ok(profile, "Channel profile fetched successfully"))
}

/// `GET /users/history`: the caller's watch history, most recent first.
pub async fn watch_history(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let pg = Pagination::from_query(&query);
    let history = feeds::watch_history(&state.db, user.0, pg).await?;
    Ok(ApiResponse::ok(history, "Watch history fetched successfully"))
}
