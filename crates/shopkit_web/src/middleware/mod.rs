//! Cross-cutting HTTP middleware.
//!
//! Layer order matters: the exception rewrite must sit outside the timeout and
//! panic layers so it sees the statuses they produce.

pub mod gateway_guard;
pub mod global_exception;

pub use gateway_guard::gateway_guard_middleware;
pub use global_exception::{global_exception_middleware, handle_panic};
