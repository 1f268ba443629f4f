//! Lossy Line Decoding
//!
//! Turns raw file bytes into text lines at the I/O boundary so the
//! parsers only ever see valid UTF-8.

use std::fs;
use std::path::Path;

use crate::error::{CorrelateError, Result};

/// Reads a file and splits it into lossily-decoded lines.
pub fn read_lines_lossy(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|e| CorrelateError::io("Failed to read", path, e))?;
    Ok(decode_lines(&bytes))
}

/// Splits bytes into lines and decodes each one.
///
/// `\n`, `\r\n` and a bare `\r` all terminate a line and are not kept.
/// A trailing terminator does not produce an extra empty line.
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(decode_lossy(&bytes[start..i]));
                start = i + 1;
            }
            b'\r' => {
                lines.push(decode_lossy(&bytes[start..i]));
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        lines.push(decode_lossy(&bytes[start..]));
    }

    lines
}

/// Decodes UTF-8, dropping invalid byte sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
