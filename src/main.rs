use axum::{Router, http::StatusCode, middleware, routing::get};
use log::{error, info};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::integration::Env;
use crate::state::AppState;

mod auth;
mod conversation;
mod error;
mod event;
mod integration;
mod message;
mod schema;
mod state;
mod template;
mod user;

type Result<T> = std::result::Result<T, error::Error>;

#[tokio::main]
async fn main() {
    let config = integration::Config::default();
    let state = AppState::init(&config).await;

    let addr = config.env.addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => panic!("Failed to bind {addr}: {e}"),
    };

    info!("listening on {addr}");
    if let Err(e) = axum::serve(listener, app(state, &config.env)).await {
        error!("server stopped: {e}");
    }
}

fn app(s: AppState, env: &Env) -> Router {
    let api = Router::new()
        .merge(conversation::api(s.clone()))
        .merge(message::api(s.clone()))
        .route_layer(middleware::from_fn_with_state(
            s,
            auth::middleware::authorize,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(
            CorsLayer::new()
                .allow_origin(env.allow_origin())
                .allow_methods(env.allow_methods())
                .allow_headers(env.allow_headers()),
        )
        .layer(TraceLayer::new_for_http())
}

async fn health() -> StatusCode {
    StatusCode::OK
}
