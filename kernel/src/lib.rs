//! Trellis Kernel - board synchronization core.
//!
//! This crate keeps a local Kanban board in step with a remote project
//! tracker that speaks two incompatible API generations, applies card moves
//! optimistically with whole-board rollback, and exposes both behind an
//! authenticated HTTP dispatcher.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// HTTP action dispatcher and its client.
pub mod api;
/// Board assembly for both API generations.
pub mod assembler;
/// Board domain model.
pub mod board;
/// Status-field discovery heuristics.
pub mod discovery;
/// Optimistic mutation engine and board view model.
pub mod engine;
/// Infrastructure components (config, server, telemetry, audit).
pub mod infrastructure;
/// Remote board client over the typed query and legacy REST APIs.
pub mod remote;
