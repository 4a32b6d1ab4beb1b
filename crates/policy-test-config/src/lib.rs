// crates/policy-test-config/src/lib.rs
// ============================================================================
// Module: Policy Test Config Library
// Description: Canonical verification configuration model and validation.
// Purpose: Provide strict config loading for policy test runs.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! This crate owns the TOML configuration consumed by suite verification.
//! Loading fails closed: unknown fields, oversized files, and out-of-range
//! values are rejected before any suite runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::LimitsConfig;
pub use config::OutputConfig;
pub use config::OutputFormat;
pub use config::RunConfig;
pub use config::SuitesConfig;
pub use config::VerifyConfig;
