//! HTTP middleware: sessions and authentication extractors.

pub mod auth;
pub mod session;

pub use auth::{OptionalUser, RequireUser};
pub use session::{SESSION_COOKIE_NAME, create_memory_session_layer, create_session_layer};
