//! Domain models for the gateway.

pub mod generation;

pub use generation::{GenerationRequest, GenerationResponse, Part};
