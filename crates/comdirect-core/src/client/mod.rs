//! The [`Client`] and its settings.

#[allow(clippy::module_inception)]
mod client;
mod client_settings;
#[doc(hidden)]
pub mod internal;

pub use client::Client;
pub use client_settings::ClientSettings;
