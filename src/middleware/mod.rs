pub mod auth;

pub use auth::{require_caller, resolve_caller, Caller};
