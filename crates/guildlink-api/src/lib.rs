//! HTTP gateway to the guild bot service.

mod client;

pub use client::{DEFAULT_BOT_URL, HttpBotApi};
