//! Text to IPA phonemes via the espeak-ng command-line frontend.
//!
//! The model vocabulary is defined over IPA characters, so every text chunk
//! passes through espeak-ng before tokenization. `--ipa=3` separates phonemes
//! with underscores; the tokenizer drops characters outside the symbol table,
//! so the separators vanish downstream.

use anyhow::{bail, Context, Result};
use std::process::{Command, Stdio};

const ESPEAK_PROGRAM: &str = "espeak-ng";

/// Argument list for one phonemization call. The `--` terminator keeps a
/// chunk that begins with `-` from being parsed as an option.
fn espeak_args(text: &str) -> [&str; 6] {
    ["-q", "--ipa=3", "-v", "en-us", "--", text]
}

/// Convert a text chunk to IPA phonemes.
pub fn phonemize(text: &str) -> Result<String> {
    let output = Command::new(ESPEAK_PROGRAM)
        .args(espeak_args(text))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("failed to run {ESPEAK_PROGRAM}: ensure it is installed"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{ESPEAK_PROGRAM} failed: {}", stderr.trim());
    }

    let phonemes = String::from_utf8(output.stdout)
        .context("espeak-ng emitted non-utf8 output")?
        .trim()
        .to_string();
    if phonemes.is_empty() {
        bail!("{ESPEAK_PROGRAM} returned no phonemes for input '{text}'");
    }
    Ok(phonemes)
}
