//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the catalog core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - The background execution context and owned task groups
//!
//! ## Overview
//!
//! This crate contains the runtime utilities every other crate depends on.
//! It establishes where I/O runs (never on the host's UI thread), how
//! background work is owned and cancelled, and the logging conventions used
//! throughout the workspace.

pub mod config;
pub mod error;
pub mod logging;
pub mod tasks;

pub use error::{Error, Result};
pub use tasks::{BackgroundContext, TaskGroup};
