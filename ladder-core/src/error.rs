//! Error types for Ladder.
//!
//! Errors travel through a dispatch as [`BoxError`] values: whatever a handler
//! signals with [`Next::fail`] or returns as `Err` is handed, unchanged, to the
//! next matching error handler. [`DispatchError`] covers the faults the engine
//! itself produces.
//!
//! [`Next::fail`]: crate::Next::fail

use std::{any::Any, time::Duration};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The outcome of a single handler invocation.
///
/// `Err` is treated exactly like calling [`Next::fail`] with that error,
/// provided the handler has not advanced the chain yet.
///
/// [`Next::fail`]: crate::Next::fail
pub type HandlerResult = Result<(), BoxError>;

/// Faults raised by the dispatch engine on behalf of a handler.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The handler panicked while it was being polled.
    #[error("handler panicked: {0}")]
    Panic(String),

    /// The handler did not finish within its time budget.
    #[error("handler timed out after {0:?}")]
    Timeout(Duration),
}

impl DispatchError {
    /// Build a [`DispatchError::Panic`] from a caught unwind payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_owned(),
                Err(_) => "non-string panic payload".to_owned(),
            },
        };
        DispatchError::Panic(message)
    }
}
