//! Session module - errors raised by session store operations.

mod errors;

pub use errors::SessionError;
