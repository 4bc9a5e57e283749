pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod security;
pub mod services;
pub mod views;

use std::sync::Arc;

use sqlx::PgPool;

use crate::security::jwt::TokenSigner;
use crate::services::auth::AuthService;
use crate::services::storage::BlobStore;

/// Shared application state, cloned into every worker.
///
/// Everything here is an explicit handle; no component reaches for a
/// process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub blobs: Arc<dyn BlobStore>,
    pub signer: TokenSigner,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(db: PgPool, blobs: Arc<dyn BlobStore>, signer: TokenSigner) -> Self {
        let auth = AuthService::new(Arc::new(db.clone()), signer.clone());
        Self {
            db,
            blobs,
            signer,
            auth,
        }
    }
}
