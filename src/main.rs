//! SkillSync Hub Backend
//!
//! REST backend for member profiles, the project proposal, collaboration requests and contact
//! messages, with SQLite persistence and token-based admin access.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod validation;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::TokenService;
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SkillSync Hub Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if !config.jwt_secret_configured {
        tracing::warn!(
            "No token secret configured (SKILLSYNC_JWT_SECRET). Using the development default!"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    if let Some(admin) = &config.admin {
        repo.ensure_admin(&admin.name, &admin.email, &admin.password)
            .await?;
    }

    let state = AppState {
        repo,
        tokens: Arc::new(TokenService::new(&config)),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        // Auth
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login))
        // Members
        .route("/members", get(api::list_members))
        .route("/members/{id}", get(api::get_member))
        // Proposal
        .route("/proposal", get(api::get_proposal))
        // Collaboration requests
        .route("/collab", post(api::create_collab_request))
        .route("/collab/public", get(api::list_collab_requests))
        // Contact messages
        .route("/contact", post(api::create_contact))
        .route("/contact/public", get(api::list_contacts));

    let user_routes = Router::new()
        .route("/auth/me", get(api::me))
        .route("/auth/logout", get(api::logout))
        .route("/auth/updatedetails", put(api::update_details))
        .route("/auth/updatepassword", put(api::update_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    let admin_routes = Router::new()
        // Members
        .route("/members", post(api::create_member))
        .route("/members/{id}", put(api::update_member))
        .route("/members/{id}", delete(api::delete_member))
        // Proposal
        .route("/proposal", put(api::update_proposal))
        .route("/proposal/versions", get(api::list_proposal_versions))
        .route("/proposal/{id}/archive", put(api::archive_proposal))
        // Collaboration requests
        .route("/collab", get(api::list_collab_requests))
        .route("/collab/pending", get(api::pending_collab_requests))
        .route("/collab/status/{status}", get(api::collab_requests_by_status))
        .route("/collab/{id}", get(api::get_collab_request))
        .route("/collab/{id}", put(api::update_collab_request))
        .route("/collab/{id}", delete(api::delete_collab_request))
        // Contact messages
        .route("/contact", get(api::list_contacts))
        .route("/contact/new", get(api::new_contacts))
        .route("/contact/status/{status}", get(api::contacts_by_status))
        .route("/contact/{id}", get(api::get_contact))
        .route("/contact/{id}", put(api::update_contact))
        .route("/contact/{id}", delete(api::delete_contact))
        .route("/contact/{id}/read", put(api::mark_contact_read))
        // Role check runs after authentication
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    let api_routes = public_routes.merge(user_routes).merge(admin_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
