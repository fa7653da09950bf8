//! One-shot synthesis driver.
//!
//! Runs with no arguments: loads the KittenTTS nano model (cached after the
//! first run), synthesizes a fixed sentence in a fixed voice, and writes
//! `output.wav` to the working directory. Any failure propagates and exits
//! the process non-zero with the underlying diagnostic.

use anyhow::Result;
use mew::audio::io::WavIo;
use mew::{TtsModel, SAMPLE_RATE};

const MODEL_ID: &str = "KittenML/kitten-tts-nano-0.1";
const VOICE: &str = "expr-voice-4-m";
const TEXT: &str = "Oh no, did I forget to save the output? Let's try again!";
const OUTPUT_PATH: &str = "output.wav";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut tts = TtsModel::from_hub(MODEL_ID)?;
    let audio = tts.synthesize(TEXT, VOICE, 1.0)?;
    WavIo::write_wav(OUTPUT_PATH, &audio, SAMPLE_RATE)?;
    println!("Audio saved as {OUTPUT_PATH}");
    Ok(())
}
