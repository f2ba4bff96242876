//! Standard middleware.
//!
//! Each middleware is a plain [`Handler`](ladder_core::Handler) (or wraps
//! one), so it is registered like any other handler.

#[cfg(feature = "tracing")]
mod logging;
#[cfg(feature = "tracing")]
mod span;
#[cfg(feature = "timeout")]
mod timeout;

#[cfg(feature = "tracing")]
pub use logging::Logger;
#[cfg(feature = "tracing")]
pub use span::{REQUEST_ID_HEADER, Traced};
#[cfg(feature = "timeout")]
pub use timeout::Timeout;
