/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasknest_api::{app::{build_router, AppState}, config::Config};
/// use tasknest_shared::cache::{memory::MemoryCache, TaskCache};
/// use tasknest_shared::store::memory::{MemoryTaskStore, MemoryUserStore};
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(
///     config,
///     Arc::new(MemoryUserStore::new()),
///     Arc::new(MemoryTaskStore::new()),
///     TaskCache::new(Arc::new(MemoryCache::new())),
/// )?;
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tasknest_shared::auth::gate::AuthGate;
use tasknest_shared::auth::jwt::TokenIssuer;
use tasknest_shared::cache::TaskCache;
use tasknest_shared::services::accounts::AccountService;
use tasknest_shared::services::tasks::TaskService;
use tasknest_shared::store::{TaskStore, UserStore};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;
use crate::middleware::auth::require_auth;
use crate::routes;

/// Shared application state
///
/// Cloned into every handler through axum's `State` extractor. Every field
/// is a handle, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub gate: AuthGate,

    pub accounts: AccountService,

    pub tasks: TaskService,

    /// Credential store handle, used for health reporting
    pub users: Arc<dyn UserStore>,

    pub cache: TaskCache,
}

impl AppState {
    /// Wires services to the given store and cache handles
    ///
    /// # Errors
    ///
    /// Fails if the configured token algorithm is not supported.
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        cache: TaskCache,
    ) -> anyhow::Result<Self> {
        let tokens = TokenIssuer::new(&config.jwt.secret, &config.jwt.algorithm)?;
        let token_ttl = chrono::Duration::minutes(config.jwt.access_token_expire_minutes);

        Ok(Self {
            gate: AuthGate::new(tokens.clone(), users.clone()),
            accounts: AccountService::new(users.clone(), tokens, token_ttl),
            tasks: TaskService::new(tasks, cache.clone()),
            users,
            cache,
            config: Arc::new(config),
        })
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET /                          # Welcome message
/// ├── GET /health                    # Health check (public)
/// └── {API_PREFIX}/                  # default /api/v1
///     ├── /auth/
///     │   ├── POST /register
///     │   └── POST /login            # form-encoded
///     ├── /users/                    # bearer auth
///     │   ├── GET  /me
///     │   └── PUT  /me
///     └── /tasks/                    # bearer auth
///         ├── GET    /               # ?skip=&limit=
///         ├── POST   /
///         ├── GET    /:id
///         ├── PUT    /:id
///         └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Outermost first: CORS, request timeout, HTTP tracing, then bearer
/// authentication on the protected groups.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", axum::routing::post(routes::auth::register))
        .route("/login", axum::routing::post(routes::auth::login));

    let user_routes = Router::new()
        .route(
            "/me",
            get(routes::users::read_me).put(routes::users::update_me),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/tasks", task_routes);

    let public_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check));

    let router = if state.config.api.prefix.is_empty() {
        public_routes.merge(api_routes)
    } else {
        public_routes.nest(&state.config.api.prefix, api_routes)
    };

    let timeout = Duration::from_secs(state.config.api.request_timeout_secs);

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allows_any() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
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
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
