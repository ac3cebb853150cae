use events::EventPublisher;
use service::config::Config;
use service::logging::Logger;
use service::AppState;
use sse::domain_event_handler::SseDomainEventHandler;
use sse::Manager;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let db = Arc::new(
        service::init_database(&config)
            .await
            .expect("Failed to connect to the database"),
    );

    let cache_store = service::init_cache(&config).expect("Failed to initialize the cache backend");

    // Presence and fan-out are process-local: the registry starts empty on
    // every boot and is repopulated by incoming connections.
    let sse_manager = Arc::new(Manager::new());
    let event_publisher = Arc::new(
        EventPublisher::new().with_handler(Arc::new(SseDomainEventHandler::new(
            sse_manager.clone(),
        ))),
    );

    let app_state = AppState::new(config, &db, cache_store, sse_manager, event_publisher);

    if let Err(err) = web::init_server(app_state).await {
        log::error!("Server error: {err}");
    }
}
