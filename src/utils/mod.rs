//! Shared utilities

pub mod error;

pub use error::{SessionError, SessionResult};
