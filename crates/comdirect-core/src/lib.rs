//! Core client for the comdirect REST API.
//!
//! The [`Client`] owns the HTTP configuration and the [`Credential`](auth::Credential) produced
//! by the login flow. Authentication is exposed through [`Client::auth`], the data endpoints live
//! in the `comdirect-banking` crate and are layered on top of the same client.

pub mod auth;
pub mod client;
mod error;
pub(crate) mod http;

pub use client::{Client, ClientSettings};
pub use error::{ApiError, NotAuthenticatedError};
