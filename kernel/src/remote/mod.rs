//! Remote Board Client.
//!
//! A uniform interface over two incompatible backend generations: the typed
//! query API (V2 projects) and the legacy REST API (classic projects). The
//! generation is picked per project; project discovery walks a fallback
//! chain across both.

pub mod client;
pub mod config;
pub mod error;
pub mod graphql;
pub mod http;
pub mod rest;
pub mod retry;
pub mod service;

pub use client::{ProjectTier, RemoteBoardClient};
pub use config::{PageLimits, RemoteConfig};
pub use error::RemoteError;
pub use retry::RetryConfig;
pub use service::{
    BoardService, CardPosition, CreateIssueRequest, Issue, MoveCardRequest, MovedCard,
};
