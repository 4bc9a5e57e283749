use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use videotube::config::Config;
use videotube::error::{json_config, path_config, query_config};
use videotube::handlers::{
    comments, dashboard, healthcheck, likes, playlists, subscriptions, tweets, users, videos,
};
use videotube::middleware::JwtAuthMiddleware;
use videotube::security::jwt::TokenSigner;
use videotube::services::storage::S3BlobStore;
use videotube::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("Failed to run database migrations")?;

    let aws_cfg = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.s3_region.clone()))
        .load()
        .await;
    let public_base_url = config.s3_public_base_url.clone().unwrap_or_else(|| {
        format!(
            "https://{}.s3.{}.amazonaws.com",
            config.s3_bucket, config.s3_region
        )
    });
    let blobs = Arc::new(S3BlobStore::new(
        aws_sdk_s3::Client::new(&aws_cfg),
        config.s3_bucket.clone(),
        public_base_url,
    ));

    let signer = TokenSigner::from_config(&config);
    let state = AppState::new(db, blobs, signer);

    let bind_addr = (config.host.clone(), config.port);
    tracing::info!(host = %bind_addr.0, port = bind_addr.1, "Starting server");

    let cors_origin = config.cors_origin.clone();

    HttpServer::new(move || {
        let cors = match cors_origin.as_deref() {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(path_config())
            .app_data(json_config())
            .app_data(query_config())
            .wrap(Logger::default())
            .wrap(cors)
            .service(
                web::scope("/api/v1")
                    .route("/healthcheck", web::get().to(healthcheck::healthcheck))
                    .service(
                        web::scope("/users")
                            .route("/register", web::post().to(users::register))
                            .route("/login", web::post().to(users::login))
                            .route("/refresh-token", web::post().to(users::refresh_token))
                            .service(
                                web::scope("")
                                    .wrap(JwtAuthMiddleware)
                                    .route("/logout", web::post().to(users::logout))
                                    .route(
                                        "/change-password",
                                        web::post().to(users::change_password),
                                    )
                                    .route("/current-user", web::get().to(users::current_user))
                                    .route(
                                        "/update-account",
                                        web::patch().to(users::update_account),
                                    )
                                    .route("/avatar", web::patch().to(users::update_avatar))
                                    .route(
                                        "/cover-image",
                                        web::patch().to(users::update_cover_image),
                                    )
                                    .route("/c/{username}", web::get().to(users::channel_profile))
                                    .route("/history", web::get().to(users::watch_history)),
                            ),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware)
                            .service(
                                web::scope("/videos")
                                    .route("", web::get().to(videos::list_videos))
                                    .route("", web::post().to(videos::publish_video))
                                    .route("/{videoId}", web::get().to(videos::get_video))
                                    .route("/{videoId}", web::patch().to(videos::update_video))
                                    .route("/{videoId}", web::delete().to(videos::delete_video))
                                    .route(
                                        "/toggle-publish/{videoId}",
                                        web::patch().to(videos::toggle_publish),
                                    ),
                            )
                            .service(
                                web::scope("/comments")
                                    .route("/{videoId}", web::get().to(comments::get_video_comments))
                                    .route("/{videoId}", web::post().to(comments::add_comment))
                                    .route(
                                        "/{commentId}",
                                        web::patch().to(comments::update_comment),
                                    )
                                    .route(
                                        "/{commentId}",
                                        web::delete().to(comments::delete_comment),
                                    ),
                            )
                            .service(
                                web::scope("/tweets")
                                    .route("", web::post().to(tweets::create_tweet))
                                    .route("/user", web::get().to(tweets::get_user_tweets))
                                    .route("/{tweetId}", web::patch().to(tweets::update_tweet))
                                    .route("/{tweetId}", web::delete().to(tweets::delete_tweet)),
                            )
                            .service(
                                web::scope("/playlist")
                                    .route("", web::post().to(playlists::create_playlist))
                                    .route(
                                        "/user/{userId}",
                                        web::get().to(playlists::get_user_playlists),
                                    )
                                    .route(
                                        "/add/{videoId}/{playlistId}",
                                        web::patch().to(playlists::add_video_to_playlist),
                                    )
                                    .route(
                                        "/remove/{videoId}/{playlistId}",
                                        web::patch().to(playlists::remove_video_from_playlist),
                                    )
                                    .route("/{playlistId}", web::get().to(playlists::get_playlist))
                                    .route(
                                        "/{playlistId}",
                                        web::patch().to(playlists::update_playlist),
                                    )
                                    .route(
                                        "/{playlistId}",
                                        web::delete().to(playlists::delete_playlist),
                                    ),
                            )
                            .service(
                                web::scope("/likes")
                                    .route(
                                        "/toggle/v/{videoId}",
                                        web::post().to(likes::toggle_video_like),
                                    )
                                    .route(
                                        "/toggle/c/{commentId}",
                                        web::post().to(likes::toggle_comment_like),
                                    )
                                    .route(
                                        "/toggle/t/{tweetId}",
                                        web::post().to(likes::toggle_tweet_like),
                                    )
                                    .route("/videos", web::get().to(likes::get_liked_videos)),
                            )
                            .service(
                                web::scope("/subscriptions")
                                    .route(
                                        "/c/{channelId}",
                                        web::get().to(subscriptions::get_channel_subscribers),
                                    )
                                    .route(
                                        "/c/{channelId}",
                                        web::post().to(subscriptions::toggle_subscription),
                                    )
                                    .route(
                                        "/s/{subscriberId}",
                                        web::get().to(subscriptions::get_subscribed_channels),
                                    ),
                            )
                            .service(
                                web::scope("/dashboard")
                                    .route("/stats", web::get().to(dashboard::get_channel_stats))
                                    .route("/videos", web::get().to(dashboard::get_channel_videos)),
                            ),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
