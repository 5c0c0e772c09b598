//! Core trial logic module

pub mod cancel;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod progress;
pub mod session;
pub mod types;
