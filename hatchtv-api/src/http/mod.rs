// Module: http
// JSON/multipart HTTP surface for uploads, record checks, and hatch hooks.

pub mod error;
pub mod hook;
pub mod landing;
pub mod video;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use hatchtv_core::service::{HatchReconciler, IntakeService, PublishSync, VideoLibrary};
use hatchtv_core::Config;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub library: Arc<VideoLibrary>,
    pub intake: Arc<IntakeService>,
    /// Present only when the remote-publish capability is configured.
    pub reconciler: Option<Arc<HatchReconciler>>,
    pub publisher: Option<Arc<PublishSync>>,
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(landing::landing).post(video::upload))
        .route("/transcode", post(video::upload))
        .route("/:identity", get(video::record_status));

    if state.reconciler.is_some() {
        router = router.route("/hook/:identity/:day", get(hook::run_hook));
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
