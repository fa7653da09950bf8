//! Shared test utilities for building synthetic voice archives.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Serialize an npy v1 payload for a `1 x len` f32 array.
pub fn npy_row(data: &[f32]) -> Vec<u8> {
    let header = format!(
        "{{'descr': '<f4', 'fortran_order': False, 'shape': (1, {}), }}\n",
        data.len()
    );
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"\x93NUMPY\x01\x00");
    bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());
    for value in data {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Build an in-memory `voices.npz` with one entry per `(tag, style)` pair.
pub fn npz_archive(voices: &[(&str, Vec<f32>)]) -> Cursor<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (tag, style) in voices {
        writer
            .start_file(format!("{tag}.npy"), options)
            .expect("start npz entry");
        writer.write_all(&npy_row(style)).expect("write npz entry");
    }
    writer.finish().expect("finish npz")
}
