//! REST API routes for the board dispatcher.

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::handlers::{get_board, post_board, DispatcherState, BOARD_ROUTE};

/// API routes for the board dispatcher.
///
/// Creates a router with `GET` and `POST` mounted at [`BOARD_ROUTE`].
pub fn routes() -> Router<Arc<DispatcherState>> {
    Router::new().route(BOARD_ROUTE, get(get_board).post(post_board))
}
