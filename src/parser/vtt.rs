use super::{normalise_newlines, split_time_range};
use crate::subtitle::TimedBlock;
use crate::timecode::parse_timecode;

/// Read WebVTT cues in a single pass over the lines.
///
/// A `-->` line opens a cue and closes the previous one; a blank line also
/// closes it. Lines outside a cue (header, NOTE and STYLE blocks, cue
/// identifiers) are ignored.
pub(super) fn parse(text: &str) -> Vec<TimedBlock> {
    let text = normalise_newlines(text);
    let mut blocks = Vec::new();
    let mut open: Option<(f64, f64)> = None;
    let mut lines: Vec<String> = Vec::new();

    for line in text.split('\n') {
        if let Some((start, end)) = split_time_range(line) {
            flush(&mut blocks, open, &mut lines);
            open = Some((parse_timecode(start), parse_timecode(end)));
        } else if line.trim().is_empty() {
            flush(&mut blocks, open.take(), &mut lines);
        } else if open.is_some() && line != "WEBVTT" {
            lines.push(line.trim_end().to_string());
        }
    }
    flush(&mut blocks, open, &mut lines);
    blocks
}

fn flush(blocks: &mut Vec<TimedBlock>, open: Option<(f64, f64)>, lines: &mut Vec<String>) {
    let text = std::mem::take(lines);
    if let Some((start, end)) = open {
        if !text.is_empty() {
            blocks.push(TimedBlock::new(start, end, text));
        }
    }
}
