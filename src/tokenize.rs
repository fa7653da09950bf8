//! Symbol table and text chunking for the synthesis pipeline.
//!
//! The model's vocabulary is a fixed character inventory: a pad symbol,
//! punctuation, Latin letters, and IPA letters, indexed in that order.
//! Characters outside the inventory are silently dropped, matching the
//! upstream Python implementation.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Token id of the pad symbol, prepended and appended to every sequence.
pub const PAD_TOKEN: i64 = 0;

/// Longest text chunk fed to a single model invocation.
pub const MAX_CHUNK_CHARS: usize = 400;

static TOKEN_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]").expect("valid regex"));
static SENTENCE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid regex"));
static SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Maps vocabulary characters to token ids.
#[derive(Debug)]
pub struct TextCleaner {
    symbol_ids: HashMap<char, i64>,
}

impl TextCleaner {
    pub fn new() -> Self {
        let pad = "$";
        let punctuation = ";:,.!?¡¿—…\"«»\u{201c}\u{201d} ";
        let letters = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
        let letters_ipa = "ɑɐɒæɓʙβɔɕçɗɖðʤəɘɚɛɜɝɞɟʄɡɠɢʛɦɧħɥʜɨɪʝɭɬɫɮʟɱɯɰŋɳɲɴøɵɸθœɶʘɹɺɾɻʀʁɽʂʃʈʧʉʊʋⱱʌɣɤʍχʎʏʑʐʒʔʡʕʢǀǁǂǃˈˌːˑʼʴʰʱʲʷˠˤ˞↓↑→↗↘'̩'ᵻ";

        let mut symbol_ids = HashMap::new();
        let symbols = pad
            .chars()
            .chain(punctuation.chars())
            .chain(letters.chars())
            .chain(letters_ipa.chars());
        for (id, symbol) in symbols.enumerate() {
            symbol_ids.insert(symbol, id as i64);
        }
        Self { symbol_ids }
    }

    /// Append the token ids of every in-vocabulary character of `text`.
    fn encode_into(&self, text: &str, out: &mut Vec<i64>) {
        for ch in text.chars() {
            if let Some(id) = self.symbol_ids.get(&ch) {
                out.push(*id);
            }
        }
    }

    /// Tokenize an IPA phoneme string, normalizing inter-word gaps to a
    /// single encoded space.
    pub fn tokenize_phonemes(&self, phonemes: &str) -> Vec<i64> {
        let mut tokens = Vec::new();
        let mut first = true;
        for piece in TOKEN_SPLIT_RE.find_iter(phonemes) {
            if !first {
                self.encode_into(" ", &mut tokens);
            }
            self.encode_into(piece.as_str(), &mut tokens);
            first = false;
        }
        tokens
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim and collapse runs of whitespace to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    SPACES_RE.replace_all(text.trim(), " ").to_string()
}

/// Normalize whitespace and reject input with nothing to synthesize.
pub fn prepare_text(text: &str) -> Result<String> {
    let cleaned = normalize_whitespace(text);
    if cleaned.is_empty() {
        bail!("input text is empty");
    }
    Ok(cleaned)
}

/// Split text into sentence chunks of at most `max_len` characters, each
/// ending with punctuation. Over-long sentences are split on word boundaries.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();

    for part in SENTENCE_SPLIT_RE.split(text) {
        let sentence = part.trim();
        if sentence.is_empty() {
            continue;
        }
        if sentence.len() <= max_len {
            chunks.push(ensure_punctuation(sentence));
            continue;
        }

        let mut current = String::new();
        for word in sentence.split_whitespace() {
            if word.len() <= max_len {
                push_word(&mut chunks, &mut current, word, max_len);
            } else {
                for piece in split_oversized(word, max_len) {
                    push_word(&mut chunks, &mut current, &piece, max_len);
                }
            }
        }
        if !current.is_empty() {
            chunks.push(ensure_punctuation(&current));
        }
    }

    chunks
}

/// Append a word to the chunk under construction, flushing it first if the
/// word no longer fits.
fn push_word(chunks: &mut Vec<String>, current: &mut String, word: &str, max_len: usize) {
    if current.is_empty() {
        current.push_str(word);
    } else if current.len() + 1 + word.len() <= max_len {
        current.push(' ');
        current.push_str(word);
    } else {
        chunks.push(ensure_punctuation(current));
        current.clear();
        current.push_str(word);
    }
}

/// Break a word longer than `max_len` into pieces on char boundaries.
fn split_oversized(word: &str, max_len: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        if !current.is_empty() && current.len() + ch.len_utf8() > max_len {
            pieces.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// The model expects every chunk to end with punctuation; sentences that lost
/// theirs to the splitter get a comma back.
fn ensure_punctuation(sentence: &str) -> String {
    match sentence.chars().last() {
        Some('.' | '!' | '?' | ',' | ';' | ':') => sentence.to_string(),
        _ => format!("{sentence},"),
    }
}
