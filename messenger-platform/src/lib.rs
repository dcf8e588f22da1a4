//! # messenger-platform
//!
//! Messaging platform side of the dispatcher: the Send API [`messenger_core::DeliveryChannel`]
//! and its configuration. No routing or session logic lives here.

mod config;
mod send_api;

pub use config::{MessengerConfig, DEFAULT_API_URL};
pub use send_api::{mask_token, SendApiClient};
