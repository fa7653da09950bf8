//! KittenTTS synthesis through ONNX Runtime.
//!
//! The ONNX graph takes three inputs: `input_ids` (i64, `[1, T]` phoneme
//! token ids), `style` (f32, `[1, D]` voice embedding), and `speed`
//! (f32, `[1]`), and returns the waveform as its first output.

use crate::download::{fetch_model, ModelArtifacts};
use crate::phonemize;
use crate::tokenize::{self, TextCleaner, MAX_CHUNK_CHARS, PAD_TOKEN};
use crate::voice::VoiceBank;
use anyhow::{bail, Context, Result};
use log::debug;
use ndarray::{Array1, Array2};
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

/// Native output rate of the KittenTTS models, in Hz.
pub const SAMPLE_RATE: u32 = 24_000;

/// The model emits a fixed stretch of silence at the end of every chunk;
/// these samples are dropped before concatenation.
const TRIM_TAIL_SAMPLES: usize = 5_000;

/// A loaded TTS model: ONNX session plus voice bank.
pub struct TtsModel {
    session: Session,
    voices: VoiceBank,
    cleaner: TextCleaner,
}

impl TtsModel {
    /// Build a model from already-resolved artifacts.
    pub fn load(artifacts: &ModelArtifacts) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_file(&artifacts.model_path)
            .with_context(|| {
                format!(
                    "failed to load onnx model from {}",
                    artifacts.model_path.display()
                )
            })?;
        let voices = VoiceBank::load(&artifacts.voices_path)?;
        debug!(
            "loaded {} with {} voices",
            artifacts.repo_id,
            voices.names().len()
        );

        Ok(Self {
            session,
            voices,
            cleaner: TextCleaner::new(),
        })
    }

    /// Resolve a model by HuggingFace repo id and load it.
    pub fn from_hub(repo_id: &str) -> Result<Self> {
        let artifacts = fetch_model(repo_id)?;
        Self::load(&artifacts)
    }

    /// Synthesize `text` in the given voice, returning mono f32 samples at
    /// [`SAMPLE_RATE`] Hz.
    pub fn synthesize(&mut self, text: &str, voice: &str, speed: f32) -> Result<Vec<f32>> {
        let cleaned = tokenize::prepare_text(text)?;
        let style = self.voices.style(voice)?.to_vec();

        let mut audio = Vec::new();
        for chunk in tokenize::chunk_text(&cleaned, MAX_CHUNK_CHARS) {
            debug!("synthesizing chunk ({} chars)", chunk.len());
            audio.extend(self.synthesize_chunk(&chunk, &style, speed)?);
        }
        Ok(audio)
    }

    fn synthesize_chunk(&mut self, chunk: &str, style: &[f32], speed: f32) -> Result<Vec<f32>> {
        let phonemes = phonemize::phonemize(chunk)
            .with_context(|| format!("failed phonemizing chunk '{chunk}'"))?;
        let mut tokens = self.cleaner.tokenize_phonemes(&phonemes);
        if tokens.is_empty() {
            bail!("no in-vocabulary phonemes produced for chunk '{chunk}'");
        }
        tokens.insert(0, PAD_TOKEN);
        tokens.push(PAD_TOKEN);

        let input_ids = Array2::from_shape_vec((1, tokens.len()), tokens)
            .context("failed building input_ids tensor")?;
        let style = Array2::from_shape_vec((1, style.len()), style.to_vec())
            .context("failed building style tensor")?;
        let speed = Array1::from_vec(vec![speed]);

        let outputs = self.session.run(inputs![
            "input_ids" => Tensor::from_array(input_ids)?,
            "style" => Tensor::from_array(style)?,
            "speed" => Tensor::from_array(speed)?
        ])?;
        if outputs.len() == 0 {
            bail!("model returned no output tensors");
        }
        let (_, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("failed extracting f32 output tensor")?;

        let mut samples = data.to_vec();
        if samples.len() <= TRIM_TAIL_SAMPLES {
            samples.clear();
        } else {
            let keep = samples.len() - TRIM_TAIL_SAMPLES;
            samples.truncate(keep);
        }
        Ok(samples)
    }
}
