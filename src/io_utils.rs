//! I/O utilities for loading source files and resolving delimiters/encodings.
//!
//! All file reads in dashgen flow through this module. It provides:
//!
//! - **Text loading**: whole-file reads decoded via `encoding_rs`,
//!   defaulting to UTF-8, with the `-` path convention for stdin.
//! - **Delimiter sniffing**: the header line is scanned for `, ; \t |` and
//!   the most frequent candidate wins, with manual override support.

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub const DELIMITER_CANDIDATES: &[u8] = &[b',', b';', b'\t', b'|'];
pub const DEFAULT_CSV_DELIMITER: u8 = b',';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Reads the full contents of `path` (or stdin for `-`) and decodes it with
/// the given encoding, replacing malformed sequences.
pub fn read_source_text(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let bytes = if is_dash(path) {
        let mut buffer = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .context("Reading from stdin")?;
        buffer
    } else {
        fs::read(path).with_context(|| format!("Reading input file {path:?}"))?
    };
    let (decoded, _, _) = encoding.decode(&bytes);
    Ok(decoded.into_owned())
}

/// Picks the delimiter whose candidate character occurs most often in the
/// header line. Ties resolve in candidate order, so `,` beats `;` beats tab
/// beats `|`. A line with no candidate hits falls back to comma.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    let mut best = DEFAULT_CSV_DELIMITER;
    let mut best_count = 0usize;
    for &candidate in DELIMITER_CANDIDATES {
        let count = header_line.bytes().filter(|b| *b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

pub fn resolve_input_delimiter(content: &str, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| {
        let header_line = content.lines().next().unwrap_or_default();
        sniff_delimiter(header_line)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_semicolon_when_it_dominates() {
        assert_eq!(sniff_delimiter("id;name;valor;status"), b';');
    }

    #[test]
    fn falls_back_to_comma_without_candidates() {
        assert_eq!(sniff_delimiter("single_column"), b',');
    }

    #[test]
    fn tie_resolves_in_candidate_order() {
        assert_eq!(sniff_delimiter("a,b;c"), b',');
    }
}
