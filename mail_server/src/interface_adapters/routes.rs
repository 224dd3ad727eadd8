use crate::interface_adapters::auth::require_operator;
use crate::interface_adapters::handlers::{index, send_mail};
use crate::interface_adapters::state::AppState;
use axum::http::Method;
use axum::{Router, middleware, routing::get};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    // Layers run outermost first: panic recovery -> CORS -> trace -> operator auth -> handler
    Router::new()
        .route("/", get(index))
        .route("/mailSender", get(index).post(send_mail))
        .layer(middleware::from_fn_with_state(state.clone(), require_operator))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
