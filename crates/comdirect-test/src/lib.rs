//! Test helpers shared by the comdirect crates.

mod api;

pub use api::{start_api_mock, token_response};
