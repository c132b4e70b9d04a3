/// Audit logging for security events.
pub mod audit;
/// Configuration management for the kernel.
pub mod config;
/// HTTP server for the dispatcher and health probes.
pub mod server;
/// Telemetry setup for logging and tracing.
pub mod telemetry;
