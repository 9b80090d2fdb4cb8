//! Multimodal gateway: text, image and audio uploads in, generated text out.

pub mod config;
pub mod error;
pub mod handlers;
pub mod media;
pub mod models;
pub mod services;
pub mod startup;
