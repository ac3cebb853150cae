use log::info;
use tower_http::cors::CorsLayer;

pub mod controller;
pub mod error;
pub(crate) mod extractors;
pub(crate) mod params;
pub mod router;
pub(crate) mod sse;

pub use error::{Error, Result};
pub(crate) use service::AppState;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;
    let listen_addr = format!("{host}:{port}");

    info!("Server starting... listening for connections on http://{listen_addr}");

    let cors_layer = build_cors_layer(&app_state.config.allowed_origins);
    let router = router::define_routes(app_state).layer(cors_layer);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, router).await
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<axum::http::HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static(extractors::authenticated_user::VERIFIED_USER_HEADER),
        ])
        .allow_credentials(true)
}
