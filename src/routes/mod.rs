use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::{optional_auth, require_admin, require_auth};

mod admin;
mod auth;
mod favorites;
mod health;
mod ingredients;
mod pantry;
mod recipes;
mod shopping;
mod suggestions;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    // Publicly readable, but an authenticated caller also sees their own
    // unpublished recipes
    let public_reads = Router::new()
        .route("/api/recipes", get(recipes::list))
        .route("/api/recipes/{id}", get(recipes::get_one))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            optional_auth,
        ));

    let protected = Router::new()
        .route("/api/users/me", get(auth::me))
        .route("/api/recipes", post(recipes::create))
        .route("/api/recipes/my-recipes", get(recipes::list_mine))
        .route(
            "/api/recipes/{id}",
            axum::routing::put(recipes::update).delete(recipes::destroy),
        )
        .route("/api/recipes/{id}/submit-review", post(recipes::submit_review))
        .route(
            "/api/recipes/{id}/favorite",
            post(favorites::add).delete(favorites::remove),
        )
        .route("/api/favorites", get(favorites::list))
        .route("/api/ingredients", post(ingredients::contribute))
        .route(
            "/api/shopping-list",
            get(shopping::list).post(shopping::create),
        )
        .route(
            "/api/shopping-list/{id}",
            get(shopping::get_one)
                .put(shopping::update)
                .delete(shopping::destroy),
        )
        .route("/api/pantry", get(pantry::list).post(pantry::upsert))
        .route(
            "/api/pantry/{id}",
            get(pantry::get_one)
                .put(pantry::update)
                .delete(pantry::destroy),
        )
        .route("/api/suggestions", get(suggestions::list))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let admin_routes = Router::new()
        .route("/api/admin/recipes/moderate", post(admin::moderate_recipes))
        .route(
            "/api/admin/ingredients/moderate",
            post(admin::moderate_ingredients),
        )
        .route_layer(axum_middleware::from_fn(require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/ingredients", get(ingredients::list))
        .merge(public_reads)
        .merge(protected)
        .merge(admin_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
