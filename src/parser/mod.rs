//! Subtitle readers, one per input format.
//!
//! Every reader turns decoded text into an unordered list of blocks.
//! Cues that cannot be read are skipped with a warning; only input that
//! cannot be read as a whole (ill-formed XML) is an error.

mod ass;
mod fcpxml;
mod srt;
mod vtt;

use crate::error::ConvertError;
use crate::subtitle::TimedBlock;

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    SubRip,
    WebVtt,
    SubStation,
    Timeline,
}

impl Format {
    pub fn from_extension(ext: &str) -> Result<Self, ConvertError> {
        match ext.to_ascii_lowercase().as_str() {
            "srt" => Ok(Format::SubRip),
            "vtt" => Ok(Format::WebVtt),
            "ass" | "ssa" => Ok(Format::SubStation),
            "fcpxml" | "xml" => Ok(Format::Timeline),
            _ => Err(ConvertError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }

    pub fn parse(&self, text: &str) -> Result<Vec<TimedBlock>, ConvertError> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        match self {
            Format::SubRip => Ok(srt::parse(text)),
            Format::WebVtt => Ok(vtt::parse(text)),
            Format::SubStation => Ok(ass::parse(text)),
            Format::Timeline => fcpxml::parse(text),
        }
    }
}

/// Unify CRLF and lone CR line endings to LF.
fn normalise_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split a `START --> END` line, dropping anything after the end token.
fn split_time_range(line: &str) -> Option<(&str, &str)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next().unwrap_or("");
    Some((start.trim(), end))
}
