/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use bugtrack_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = bugtrack_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use bugtrack_shared::auth::middleware::{authenticate, CurrentUser};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the configured access token lifetime
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.config.jwt.token_ttl_hours)
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /v1/                          # API v1 (versioned)
///     ├── /auth/
///     │   ├── POST /register        # Public
///     │   ├── POST /login           # Public, sets access_token cookie
///     │   ├── POST /logout          # Public, clears the cookie
///     │   └── GET  /me              # Authenticated
///     ├── /projects/                # Authenticated; create is PM-gated
///     │   ├── POST /
///     │   ├── GET  /
///     │   └── GET  /:id
///     └── /issues/                  # Authenticated
///         ├── POST /
///         ├── GET  /
///         ├── GET  /assigned
///         ├── GET  /:id
///         ├── PUT  /:id/assign      # Owning PM only
///         └── PUT  /:id/status
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Cookie authentication (per-route-group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes: register/login/logout are public, /me requires the cookie
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .merge(
            Router::new()
                .route("/me", get(routes::auth::me))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    cookie_auth_layer,
                )),
        );

    // Project routes (authenticated; creation is PM-gated in the handler)
    let project_routes = Router::new()
        .route("/", post(routes::projects::create_project))
        .route("/", get(routes::projects::list_projects))
        .route("/:id", get(routes::projects::get_project))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            cookie_auth_layer,
        ));

    // Issue routes (authenticated; assignment is ownership-gated in the handler)
    let issue_routes = Router::new()
        .route("/", post(routes::issues::create_issue))
        .route("/", get(routes::issues::list_issues))
        .route("/assigned", get(routes::issues::list_assigned_issues))
        .route("/:id", get(routes::issues::get_issue))
        .route("/:id/assign", put(routes::issues::assign_issue))
        .route("/:id/status", put(routes::issues::update_issue_status))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            cookie_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/projects", project_routes)
        .nest("/issues", issue_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
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
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Cookie authentication middleware layer
///
/// Runs the credential verifier against the `access_token` cookie and
/// injects the resolved user into request extensions as [`CurrentUser`].
/// Every failure short-circuits with the fixed-message 401 before any
/// handler logic runs.
async fn cookie_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let user = authenticate(&state.db, state.jwt_secret(), req.headers()).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig, JwtConfig};

    fn test_state_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                token_ttl_hours: 24,
            },
        }
    }

    #[test]
    fn test_token_ttl_from_config() {
        let config = test_state_config();
        assert_eq!(
            chrono::Duration::hours(config.jwt.token_ttl_hours),
            chrono::Duration::hours(24)
        );
    }
}
