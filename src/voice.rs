//! Voice bank loaded from the model's `voices.npz` archive.
//!
//! The archive is a zip of `.npy` entries, one per voice, each holding the
//! style embedding the model conditions on. Which voices exist is determined
//! entirely by the archive contents.

use anyhow::{anyhow, bail, Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Style embeddings keyed by voice tag.
#[derive(Debug)]
pub struct VoiceBank {
    styles: BTreeMap<String, Vec<f32>>,
}

impl VoiceBank {
    /// Load a voice bank from an `.npz` file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open voices archive {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("failed to read voices archive {}", path.display()))
    }

    /// Load a voice bank from any seekable zip stream.
    pub fn from_reader(reader: impl Read + Seek) -> Result<Self> {
        let mut archive = ZipArchive::new(reader).context("not a valid npz archive")?;

        let mut styles = BTreeMap::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_string();
            let Some(voice) = name.strip_suffix(".npy") else {
                continue;
            };

            let mut raw = Vec::new();
            entry.read_to_end(&mut raw)?;
            let style = parse_npy_style(&raw)
                .with_context(|| format!("failed parsing npy entry '{name}'"))?;
            styles.insert(voice.to_string(), style);
        }

        if styles.is_empty() {
            bail!("voices archive contains no .npy entries");
        }
        Ok(Self { styles })
    }

    /// Style vector for a voice tag.
    pub fn style(&self, voice: &str) -> Result<&[f32]> {
        self.styles
            .get(voice)
            .map(Vec::as_slice)
            .ok_or_else(|| anyhow!("voice '{voice}' not found in voices archive"))
    }

    /// All voice tags, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.styles.keys().map(String::as_str).collect()
    }
}

/// Parse a little-endian f32 `.npy` payload into a style vector.
///
/// Entries are 1-D or 2-D; for 2-D arrays the first row is the style vector
/// (additional rows are alternate style references some models ship).
fn parse_npy_style(bytes: &[u8]) -> Result<Vec<f32>> {
    const MAGIC: &[u8] = b"\x93NUMPY";
    if bytes.len() < 12 || &bytes[..6] != MAGIC {
        bail!("invalid npy magic header");
    }

    let (header_len, header_start) = match bytes[6] {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => (
            u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize,
            12,
        ),
        version => bail!("unsupported npy version {version}"),
    };
    let header_end = header_start + header_len;
    if bytes.len() < header_end {
        bail!("npy header truncated");
    }
    let header = std::str::from_utf8(&bytes[header_start..header_end])
        .context("npy header is not valid utf-8")?;

    let descr = header_field(header, "descr").ok_or_else(|| anyhow!("missing 'descr'"))?;
    if descr != "<f4" {
        bail!("unsupported npy dtype '{descr}', expected '<f4'");
    }
    let order = header_field(header, "fortran_order").ok_or_else(|| anyhow!("missing 'fortran_order'"))?;
    if order != "False" {
        bail!("fortran-ordered npy arrays are not supported");
    }
    let shape = header_shape(header).ok_or_else(|| anyhow!("missing 'shape'"))?;
    let cols = match shape.as_slice() {
        [cols] => *cols,
        [rows, cols] if *rows >= 1 => *cols,
        _ => bail!("expected 1-D or 2-D style array, got shape {shape:?}"),
    };
    if cols == 0 {
        bail!("style array has zero columns");
    }

    let data = &bytes[header_end..];
    let total: usize = shape.iter().product();
    if data.len() != total * 4 {
        bail!(
            "npy data size mismatch: expected {} bytes, got {}",
            total * 4,
            data.len()
        );
    }

    // First row only.
    Ok(data[..cols * 4]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn header_field<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let pattern = format!("'{key}':");
    let rest = header[header.find(&pattern)? + pattern.len()..].trim_start();
    if let Some(quoted) = rest.strip_prefix('\'') {
        return Some(&quoted[..quoted.find('\'')?]);
    }
    let end = rest.find([',', '}'])?;
    Some(rest[..end].trim())
}

fn header_shape(header: &str) -> Option<Vec<usize>> {
    let rest = &header[header.find("'shape':")? + "'shape':".len()..];
    let open = rest.find('(')?;
    let close = rest[open..].find(')')? + open;
    rest[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Serialize an npy v1 payload for a 2-D f32 array.
    fn npy_bytes(rows: usize, cols: usize, data: &[f32]) -> Vec<u8> {
        assert_eq!(data.len(), rows * cols);
        let header = format!("{{'descr': '<f4', 'fortran_order': False, 'shape': ({rows}, {cols}), }}\n");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"\x93NUMPY\x01\x00");
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        for value in data {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    fn npz_with_voices(voices: &[(&str, Vec<f32>)]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, data) in voices {
            writer
                .start_file(format!("{name}.npy"), options)
                .expect("start npz entry");
            writer
                .write_all(&npy_bytes(1, data.len(), data))
                .expect("write npz entry");
        }
        writer.finish().expect("finish npz")
    }

    #[test]
    fn loads_styles_by_voice_tag() {
        let archive = npz_with_voices(&[
            ("expr-voice-4-m", vec![0.25, -0.5, 1.0]),
            ("expr-voice-4-f", vec![0.0, 0.0, 0.0]),
        ]);
        let bank = VoiceBank::from_reader(archive).expect("load bank");
        assert_eq!(bank.names(), vec!["expr-voice-4-f", "expr-voice-4-m"]);
        assert_eq!(bank.style("expr-voice-4-m").expect("style"), &[0.25, -0.5, 1.0]);
    }

    #[test]
    fn unknown_voice_is_an_error() {
        let archive = npz_with_voices(&[("expr-voice-2-f", vec![0.5])]);
        let bank = VoiceBank::from_reader(archive).expect("load bank");
        let err = bank.style("definitely-not-a-voice").unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-voice"));
    }

    #[test]
    fn empty_archive_is_an_error() {
        let writer = ZipWriter::new(Cursor::new(Vec::new()));
        let empty = writer.finish().expect("finish empty zip");
        assert!(VoiceBank::from_reader(empty).is_err());
    }

    #[test]
    fn one_dimensional_entries_are_accepted() {
        let header = "{'descr': '<f4', 'fortran_order': False, 'shape': (2,), }\n";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"\x93NUMPY\x01\x00");
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&1.5_f32.to_le_bytes());
        bytes.extend_from_slice(&(-2.0_f32).to_le_bytes());

        let style = parse_npy_style(&bytes).expect("parse 1-D npy");
        assert_eq!(style, vec![1.5, -2.0]);
    }

    #[test]
    fn multi_row_entries_keep_first_row() {
        let bytes = npy_bytes(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let style = parse_npy_style(&bytes).expect("parse 2-D npy");
        assert_eq!(style, vec![1.0, 2.0]);
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let mut bytes = npy_bytes(1, 4, &[1.0, 2.0, 3.0, 4.0]);
        bytes.truncate(bytes.len() - 4);
        assert!(parse_npy_style(&bytes).is_err());
    }
}
