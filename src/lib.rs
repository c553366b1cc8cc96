//! Team Roster
//!
//! A team-member profile form with an in-memory submission pipeline.
//!
//! # Architecture
//!
//! - **form**: the mutable draft and its mutation operations
//! - **pipeline**: validation, simulated remote call, commit, success indicator
//! - **store**: the append-only list of submitted members
//! - **client**: outbound call to a remote team-member API
//! - **api**: HTTP handlers exposing the form session

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod form;
pub mod models;
pub mod pipeline;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use form::FormStateController;
use models::FormSnapshot;
use pipeline::SubmissionPipeline;
use store::MemberList;

/// Room for JSON framing around a base64 image.
const IMAGE_BODY_OVERHEAD: usize = 64 * 1024;

/// Application state shared across all handlers: one form session per process.
#[derive(Clone)]
pub struct AppState {
    pub form: FormStateController,
    pub pipeline: SubmissionPipeline,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let form = FormStateController::new(config.form.max_image_bytes);
        let pipeline = SubmissionPipeline::new(MemberList::new(), config.form);
        Self {
            form,
            pipeline,
            config: Arc::new(config),
        }
    }

    /// Number of committed members.
    pub async fn revision_id(&self) -> i64 {
        self.pipeline.members().len().await as i64
    }

    pub async fn form_snapshot(&self) -> FormSnapshot {
        let status = self.pipeline.status().await;
        FormSnapshot {
            draft: self.form.snapshot().await,
            status,
            is_submitting: status.is_busy(),
            success_visible: self.pipeline.success_visible().await,
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let image_body_limit = image_body_limit(state.config.form.max_image_bytes);

    // API routes
    let api_routes = Router::new()
        // Form
        .route("/form", get(api::get_form).delete(api::reset_form))
        .route("/form/suggestions", get(api::get_suggestions))
        .route("/form/fields/{field}", put(api::set_field))
        .route(
            "/form/image",
            put(api::set_image)
                .delete(api::clear_image)
                .layer(DefaultBodyLimit::max(image_body_limit)),
        )
        .route("/form/submit", post(api::submit_form))
        // Members
        .route("/members", get(api::list_members))
        .route("/members/cards", get(api::list_member_cards))
        .route("/members/{id}", get(api::get_member));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Body limit for image uploads: base64 inflates by 4/3, plus JSON framing.
/// Saturates for very large configured limits.
fn image_body_limit(max_image_bytes: usize) -> usize {
    (max_image_bytes / 3)
        .saturating_add(1)
        .saturating_mul(4)
        .saturating_add(IMAGE_BODY_OVERHEAD)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
