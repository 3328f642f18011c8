//! HOUSECAST — housing price inference client
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod scaler;
pub mod tensor;
pub mod model;
pub mod backends;
pub mod dispatch;
