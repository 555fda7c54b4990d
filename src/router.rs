use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let lunar_routes = Router::new()
        .route("/api/lunar", get(handlers::lunar::get_lunar_info))
        .route("/api/lunar/cycle", get(handlers::lunar::get_lunar_cycle));

    let entry_routes = Router::new()
        .route(
            "/api/entries",
            get(handlers::entries::list_entries).post(handlers::entries::upsert_entry),
        )
        .route(
            "/api/entries/:id",
            get(handlers::entries::get_entry)
                .put(handlers::entries::update_entry)
                .delete(handlers::entries::delete_entry),
        );

    let analysis_routes = Router::new()
        .route(
            "/api/analysis/foods",
            get(handlers::analysis::get_food_analysis),
        )
        .route(
            "/api/analysis/colors",
            get(handlers::analysis::get_color_analysis),
        )
        .route(
            "/api/analysis/combinations",
            get(handlers::analysis::get_top_combinations),
        )
        .route(
            "/api/analysis/lunar-series",
            get(handlers::analysis::get_lunar_series),
        )
        .route(
            "/api/analysis/cycle",
            get(handlers::analysis::get_cycle_profile),
        );

    let cors = cors_layer(&state);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(lunar_routes)
        .merge(entry_routes)
        .merge(analysis_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&state.config.frontend_url)
        .chain(state.config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
