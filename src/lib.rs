//! BSRTC content service
//!
//! A bilingual (English/Hindi) CRUD backend for the public website with SQLite
//! document persistence and file uploads, plus the client-side console logic
//! used by the admin screens.

pub mod api;
pub mod auth;
pub mod config;
pub mod console;
pub mod db;
pub mod errors;
pub mod models;
pub mod ratelimit;
pub mod uploads;

use std::net::IpAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;
use models::{
    AboutProfile, BookingPolicy, CancellationPolicy, ContactInfo, ContactMessage, Depot,
    DirectoryDivision, Division, Faq, FlashNews, GalleryEvent, GalleryPhoto, NewsArticle, Policy,
    PopularRoute, PrivacySection, Tender, TermsSection, TouristDestination,
};
use ratelimit::RateLimiter;
use uploads::UploadStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub uploads: Arc<UploadStore>,
    pub contact_limiter: Arc<RateLimiter<IpAddr>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the database and upload directory described by `config`.
    pub async fn initialize(config: Config) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let pool = db::init_database(&config.db_path).await?;
        let uploads = UploadStore::open(&config.upload_dir).await?;
        let contact_limiter = RateLimiter::new(config.contact_rate_limit, config.contact_window);

        Ok(Self {
            repo: Arc::new(Repository::new(pool)),
            uploads: Arc::new(uploads),
            contact_limiter: Arc::new(contact_limiter),
            config: Arc::new(config),
        })
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // About
        .route("/about-us", get(api::get_about_us).post(api::save_about_us))
        .merge(api::collection_routes::<AboutProfile>())
        // Pages
        .merge(api::collection_routes::<Faq>())
        .merge(api::collection_routes::<Policy>())
        .route("/policies", put(api::replace_policies))
        .merge(api::collection_routes::<BookingPolicy>())
        .merge(api::collection_routes::<CancellationPolicy>())
        .merge(api::collection_routes::<TermsSection>())
        .merge(api::collection_routes::<PrivacySection>())
        // Helplines
        .merge(api::collection_routes::<Division>())
        .merge(api::collection_routes::<Depot>())
        .merge(api::collection_routes::<DirectoryDivision>())
        .route("/phone-directory", put(api::replace_directory))
        .merge(api::collection_routes::<ContactInfo>())
        // Media
        .merge(api::collection_routes::<Tender>())
        .merge(api::collection_routes::<NewsArticle>())
        .merge(api::collection_routes::<FlashNews>())
        .merge(api::collection_routes::<GalleryPhoto>())
        .merge(api::collection_routes::<GalleryEvent>())
        .route(
            "/gallery-events/{id}/photos/{index}",
            delete(api::remove_event_photo),
        )
        .merge(api::collection_routes::<PopularRoute>())
        .merge(api::collection_routes::<TouristDestination>())
        // Contact form (public create, admin read)
        .route(
            "/contact-messages",
            get(api::list_documents::<ContactMessage>).post(api::submit_contact_message),
        )
        .route(
            "/contact-messages/{key}",
            get(api::get_document::<ContactMessage>).delete(api::delete_document::<ContactMessage>),
        );

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    let upload_files = ServeDir::new(state.uploads.root());
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .nest("/api", api_routes)
        .nest_service(&format!("/{}", uploads::PUBLIC_PREFIX), upload_files)
        .merge(health_routes)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
