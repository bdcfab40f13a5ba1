//! Room management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Room routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_room))
        .route("/join", post(handler::join_room))
        .route("/current", get(handler::get_current_room))
        .route("/draw", post(handler::draw_names))
        .route("/close", post(handler::close_room))
        .route("/participants/{id}", delete(handler::delete_participant))
}
