use crate::{controller::health_check_controller, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::controller::{
    follow_controller, friend_request_controller, realtime_controller, user_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Social Platform API"
        ),
        paths(
            follow_controller::follow,
            follow_controller::unfollow,
            follow_controller::followers,
            follow_controller::following,
            friend_request_controller::send,
            friend_request_controller::accept,
            friend_request_controller::reject,
            friend_request_controller::received,
            friend_request_controller::sent,
            friend_request_controller::remove_friend,
            realtime_controller::relay,
            user_controller::read,
            user_controller::read_by_username,
            user_controller::search,
            user_controller::update,
            user_controller::update_avatar,
        ),
        components(
            schemas(
                domain::follows::Model,
                domain::friend_requests::Model,
                domain::users::Model,
                domain::follow::FollowView,
                domain::user::ProfileUpdate,
                domain::user::PublicProfile,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "social_platform", description = "Social Relationship Graph API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// The upstream gateway authenticates every request and forwards the verified
// principal in a header; for OpenAPI purposes that header is the API key.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "verified_user_header",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "x-user-id",
                    "Verified user id attached by the authenticating gateway",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(user_routes(app_state.clone()))
        .merge(follow_routes(app_state.clone()))
        .merge(friend_request_routes(app_state.clone()))
        .merge(realtime_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

pub fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/users/search", get(user_controller::search))
        .route(
            "/users/username/{username}",
            get(user_controller::read_by_username),
        )
        .route("/users/{id}", get(user_controller::read))
        .route("/users/{id}", put(user_controller::update))
        .route("/users/{id}/avatar", put(user_controller::update_avatar))
        .with_state(app_state)
}

pub fn follow_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/users/{id}/follow", post(follow_controller::follow))
        .route("/users/{id}/follow", delete(follow_controller::unfollow))
        .route("/users/{id}/followers", get(follow_controller::followers))
        .route("/users/{id}/following", get(follow_controller::following))
        .with_state(app_state)
}

pub fn friend_request_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/friend_requests/send/{receiver_id}",
            post(friend_request_controller::send),
        )
        .route(
            "/friend_requests/accept/{id}",
            put(friend_request_controller::accept),
        )
        .route(
            "/friend_requests/reject/{id}",
            put(friend_request_controller::reject),
        )
        .route(
            "/friend_requests/received",
            get(friend_request_controller::received),
        )
        .route(
            "/friend_requests/sent",
            get(friend_request_controller::sent),
        )
        .route(
            "/friends/{username}",
            delete(friend_request_controller::remove_friend),
        )
        .with_state(app_state)
}

fn realtime_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/realtime/message", post(realtime_controller::relay))
        .route("/sse", get(crate::sse::handler::sse_handler))
        .with_state(app_state)
}
