use std::net::SocketAddr;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use storefront_api::config::{self, Environment};
use storefront_api::database;
use storefront_api::handlers::{admin, protected, public};
use storefront_api::middleware;
use storefront_api::state::AppState;
use storefront_api::auth::AuthKeys;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("starting storefront API in {:?} mode", config.environment);

    // An empty signing secret is a startup-time misconfiguration, not a
    // per-request error; refuse to serve.
    let keys = AuthKeys::from_secret(&config.security.jwt_secret, config.security.jwt_expiry_days)
        .unwrap_or_else(|e| panic!("auth configuration error: {}", e));

    let pool = database::manager::connect()
        .await
        .unwrap_or_else(|e| panic!("database connection failed: {}", e));

    // A backend that cannot be migrated or seeded cannot serve any route
    database::manager::migrate(&pool)
        .await
        .unwrap_or_else(|e| panic!("schema migration failed: {}", e));
    database::seed::run(&pool)
        .await
        .unwrap_or_else(|e| panic!("seed bootstrap failed: {}", e));

    let state = AppState::new(pool, keys);
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("storefront API listening on http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}

fn app(state: AppState) -> Router {
    // Admin tier: role gate on top of the auth gate
    let admin_routes = Router::new()
        .route("/admin/products", post(admin::products::create_product))
        .route(
            "/admin/products/:id",
            axum::routing::put(admin::products::update_product)
                .delete(admin::products::delete_product),
        )
        .route("/admin/categories", post(admin::categories::create_category))
        .route(
            "/admin/categories/:id",
            axum::routing::put(admin::categories::update_category)
                .delete(admin::categories::delete_category),
        )
        .route("/admin/users", get(admin::users::list_users))
        .route(
            "/admin/users/:id",
            axum::routing::put(admin::users::update_user).delete(admin::users::delete_user),
        )
        .route("/admin/contacts", get(admin::contacts::list_contacts))
        .route(
            "/admin/contacts/:id",
            get(admin::contacts::get_contact).delete(admin::contacts::delete_contact),
        )
        .route(
            "/admin/contacts/:id/read",
            axum::routing::put(admin::contacts::mark_contact_read),
        )
        .route("/admin/analytics/visitors", get(admin::analytics::visitor_stats))
        .route(
            "/admin/analytics/phone-clicks",
            get(admin::analytics::phone_click_stats),
        )
        .route("/admin/phone-contacts", get(admin::analytics::list_phone_contacts))
        .route(
            "/admin/phone-contacts/:id",
            delete(admin::analytics::delete_phone_contact),
        )
        .route_layer(axum_middleware::from_fn(middleware::require_admin));

    // Protected tier: bearer token verified, live identity re-loaded
    let protected_routes = Router::new()
        .route(
            "/profile",
            get(protected::profile::get_profile).put(protected::profile::update_profile),
        )
        .merge(admin_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public tier
    let api = Router::new()
        .route("/register", post(public::auth::register))
        .route("/login", post(public::auth::login))
        .route("/products", get(public::catalog::list_products))
        .route("/products/:id", get(public::catalog::get_product))
        .route("/categories", get(public::catalog::list_categories))
        .route("/contact", post(public::contact::create_contact))
        .route("/quick-contact", post(public::contact::create_quick_contact))
        .route("/phone-contact", post(public::contact::create_phone_contact))
        .route("/track-visitor", post(public::tracking::track_visitor))
        .route("/track-phone-click", post(public::tracking::track_phone_click))
        .merge(protected_routes);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    let config = config::config();
    match config.environment {
        Environment::Development => CorsLayer::permissive(),
        Environment::Production => {
            let origins: Vec<HeaderValue> = config
                .security
                .cors_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true)
        }
    }
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Storefront API",
        "version": version,
        "description": "REST backend for an e-commerce storefront",
        "endpoints": {
            "health": "/health (public)",
            "auth": "/api/v1/register, /api/v1/login (public)",
            "catalog": "/api/v1/products, /api/v1/categories (public)",
            "contact": "/api/v1/contact, /api/v1/quick-contact, /api/v1/phone-contact (public)",
            "tracking": "/api/v1/track-visitor, /api/v1/track-phone-click (public)",
            "profile": "/api/v1/profile (bearer)",
            "admin": "/api/v1/admin/* (bearer + admin role)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok",
                "timestamp": now,
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "database unavailable",
                    "timestamp": now,
                })),
            )
        }
    }
}
