//! Reply suggestion pipeline: models, language detection, prompt building,
//! response normalization, and the route handlers tying them together.

pub mod handlers;
pub mod language;
pub mod models;
pub mod normalize;
pub mod prompts;
