//! HTTP handlers for the gateway.

pub mod generate;
pub mod health;

pub use generate::{audio_only, dispatch, text_audio, text_image, DispatchProfile};
pub use health::{health_check, metrics_endpoint, not_found, root};
