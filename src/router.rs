use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full HTTP surface over `state`
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .merge(system_routes())
        .merge(user_routes())
        .merge(post_routes(&state))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&config) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
}

fn user_routes() -> Router<AppState> {
    use public::{auth, users};

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user))
}

fn post_routes(state: &AppState) -> Router<AppState> {
    use protected::posts as write;
    use public::posts as read;

    let mut create = post(write::create_post);
    let mut modify = put(write::update_post).delete(write::delete_post);

    // route_layer only wraps routes already present, so reads added below stay public
    if state.config.security.require_auth {
        let auth = middleware::from_fn_with_state(state.clone(), jwt_auth_middleware);
        create = create.route_layer(auth.clone());
        modify = modify.route_layer(auth);
    }

    Router::new()
        .route("/posts", create.get(read::list_posts))
        .route("/posts/:id", modify.get(read::get_post))
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    let security: &SecurityConfig = &config.security;
    if !security.enable_cors {
        return None;
    }
    if config.is_development() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
