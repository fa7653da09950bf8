//! # mew - KittenTTS speech synthesis
//!
//! A Rust implementation of the KittenTTS inference pipeline, running the
//! published ONNX models on CPU via ONNX Runtime.
//!
//! ## Architecture Overview
//!
//! The pipeline consists of three stages:
//!
//! 1. **Model acquisition** ([`download::fetch_model`]): resolves a model by
//!    its HuggingFace repo id. The repo's `config.json` names the ONNX graph
//!    and the voice bank; all three files are cached locally after the first
//!    run.
//!
//! 2. **Synthesis** ([`TtsModel`]): text is phonemized with espeak-ng, the
//!    IPA characters are mapped through the model's fixed symbol table, and
//!    the ONNX session turns the token ids plus a per-voice style vector into
//!    a mono waveform at [`SAMPLE_RATE`] Hz.
//!
//! 3. **Persistence** ([`audio::io::WavIo`]): the waveform is written as a
//!    16-bit PCM WAV file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mew::{TtsModel, SAMPLE_RATE};
//! use mew::audio::io::WavIo;
//!
//! let mut tts = TtsModel::from_hub("KittenML/kitten-tts-nano-0.1").unwrap();
//! let audio = tts.synthesize("Hello from Rust!", "expr-voice-4-m", 1.0).unwrap();
//! WavIo::write_wav("output.wav", &audio, SAMPLE_RATE).unwrap();
//! ```
//!
//! Phonemization shells out to `espeak-ng`, which must be installed and on
//! `$PATH` (`apt install espeak-ng` / `brew install espeak-ng`).

pub mod audio;
pub mod config;
pub mod download;
pub mod model;
pub mod phonemize;
pub mod tokenize;
pub mod voice;

pub use model::tts::{TtsModel, SAMPLE_RATE};
