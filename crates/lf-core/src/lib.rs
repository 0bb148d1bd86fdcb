//! levelfit core library
//!
//! This library provides the analysis behind the `levelfit` binary:
//! - Exit codes for CLI operations
//! - Configuration loading with provenance
//! - Structured logging
//! - The load → transform → aggregate → regress pipeline
//! - Report rendering
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod pipeline;
pub mod report;
