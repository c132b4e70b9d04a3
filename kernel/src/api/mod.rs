//! Action Dispatcher.
//!
//! The HTTP boundary in front of the remote board client. Requests are
//! authenticated with bearer tokens; failures always come back as structured
//! JSON bodies, and listing failures always carry empty `projects` and
//! `columns` arrays.

pub mod auth;
pub mod client;
pub mod handlers;
pub mod routes;
pub mod types;

pub use auth::{AuthFailure, TokenAuthenticator};
pub use client::DispatcherClient;
pub use handlers::{ApiError, DispatcherState, BOARD_ROUTE};
pub use routes::routes;
pub use types::{BoardAction, BoardQuery, ColumnsResponse, EmptyListing, ProjectsResponse};
