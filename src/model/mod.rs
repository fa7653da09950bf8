//! Model loading and synthesis.

pub mod tts;
