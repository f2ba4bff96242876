//! # ladder-std
//!
//! Standard implementations for the Ladder middleware framework.
//!
//! This crate provides:
//! - **Standard middleware**: request logging, tracing spans, timeouts
//! - **Testing helpers**: [`testing`] handlers that record, count, reply and fail
//! - **Tower integration**: [`service::AppService`] (feature `tower`)
//! - **HTTP server**: [`server::listen`] over hyper (feature `server`)

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use ladder_core;

// Modules
pub mod middleware;
pub mod testing;

#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "tower")]
pub mod service;
