//! Mono WAV reading and writing backed by hound.

use anyhow::{bail, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

#[derive(Debug, Default)]
pub struct WavIo;

impl WavIo {
    /// Read a mono WAV file into f32 samples in `[-1, 1]`.
    pub fn read_wav(path: impl AsRef<Path>) -> Result<(Vec<f32>, u32)> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();
        if spec.channels != 1 {
            bail!("expected mono WAV, got {} channels", spec.channels);
        }

        let samples = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            SampleFormat::Int => {
                let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|v| v as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok((samples, spec.sample_rate))
    }

    /// Write mono samples as 16-bit PCM, overwriting any existing file.
    pub fn write_wav(path: impl AsRef<Path>, samples: &[f32], sample_rate: u32) -> Result<()> {
        if samples.is_empty() {
            bail!("no audio samples to write");
        }

        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec)?;
        for sample in samples {
            let value = sample.clamp(-1.0, 1.0);
            writer.write_sample((value * i16::MAX as f32).round() as i16)?;
        }
        writer.finalize()?;
        Ok(())
    }
}
