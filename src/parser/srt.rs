use super::{normalise_newlines, split_time_range};
use crate::subtitle::TimedBlock;
use crate::timecode::parse_timecode;

use log::debug;

/// Read SubRip cues.
///
/// The input is cut into blank-line separated chunks. The first line of a
/// chunk holding `-->` is the time range and every line after it is text;
/// sequence numbers and other leading lines are ignored.
pub(super) fn parse(text: &str) -> Vec<TimedBlock> {
    let text = normalise_newlines(text);
    let mut blocks = Vec::new();

    for chunk in chunks(&text) {
        match cue(&chunk) {
            Some(block) => blocks.push(block),
            None => debug!("Skipping unreadable cue: {:?}", chunk.first()),
        }
    }
    blocks
}

fn chunks(text: &str) -> Vec<Vec<&str>> {
    let mut chunks = Vec::new();
    let mut current = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn cue(lines: &[&str]) -> Option<TimedBlock> {
    let idx = lines.iter().position(|l| l.contains("-->"))?;
    let (start, end) = split_time_range(lines[idx])?;
    let text: Vec<String> = lines[idx + 1..]
        .iter()
        .map(|l| l.trim_end().to_string())
        .collect();
    if text.is_empty() {
        return None;
    }
    Some(TimedBlock::new(
        parse_timecode(start),
        parse_timecode(end),
        text,
    ))
}
