//! Base types and utilities for the comdirect API crates.
//!
//! This crate provides common functionality shared across the client crates:
//! - Configuration for the API client
//! - Transport error handling
//! - Cancellable request/response exchange with JSON decoding
//! - URL encoding utilities

mod configuration;
mod error;
mod exchange;
mod util;

pub use configuration::Configuration;
pub use error::Error;
pub use exchange::{exchange, exchange_bytes, exchange_empty, send, Exchange};
pub use util::urlencode;
