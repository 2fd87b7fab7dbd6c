use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod password;
pub mod session;
pub(crate) mod validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout).post(handlers::logout))
        .route(
            "/preferences",
            get(handlers::get_preferences).post(handlers::update_preferences),
        )
        .route("/bookmarks", get(handlers::get_bookmarks))
        .route("/bookmarks/toggle", post(handlers::toggle_bookmark))
}
