//! Router assembly.
//!
//! Everything a browser or API client touches runs behind the client
//! session middleware, including the HTML fallback. The sys routes sit
//! outside it so health probes never mint sessions.

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::middleware as axum_mw;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::client_session_middleware;
use crate::routes;
use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    // `layer` rather than `route_layer`: the fallback needs a session too.
    let session_routes = Router::new()
        .merge(routes::pages::router())
        .merge(routes::auth::router())
        .nest("/v1/session", routes::api::session_router())
        .nest("/v1/nfts", routes::api::nft_router())
        .nest("/v1/dashboard", routes::api::dashboard_router())
        .fallback(routes::pages::fallback)
        .layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            client_session_middleware,
        ));

    let sys_routes = Router::new()
        .nest("/v1/sys", routes::sys::router())
        .layer(tower::limit::ConcurrencyLimitLayer::new(10));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(sys_routes)
        .merge(session_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}
