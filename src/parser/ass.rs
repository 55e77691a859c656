use super::{normalise_newlines, srt};
use crate::subtitle::TimedBlock;
use crate::timecode::parse_timecode;

use log::{debug, warn};

const DEFAULT_FORMAT: [&str; 10] = [
    "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text",
];

/// Field positions of the `[Events]` section, taken from its `Format:` line.
struct EventFormat {
    fields: usize,
    start: usize,
    end: usize,
    text: usize,
}

impl EventFormat {
    fn from_names<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        let find = |wanted: &str| names.iter().position(|n| n.as_ref() == wanted);
        Some(Self {
            fields: names.len(),
            start: find("start")?,
            end: find("end")?,
            text: find("text")?,
        })
    }
}

/// Read the `Dialogue:` events of an Advanced SubStation / SubStation
/// Alpha script.
///
/// Files without a single dialogue line are read with the SubRip grammar
/// instead, since mislabelled SRT files are common.
pub(super) fn parse(text: &str) -> Vec<TimedBlock> {
    let text = normalise_newlines(text);
    let mut in_events = false;
    let mut format = EventFormat::from_names(&DEFAULT_FORMAT);
    let mut saw_dialogue = false;
    let mut blocks = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.starts_with('[') {
            in_events = line.eq_ignore_ascii_case("[events]");
            continue;
        }
        if !in_events {
            continue;
        }
        if let Some(rest) = strip_key(line, "Format") {
            let names: Vec<String> = rest
                .split(',')
                .map(|n| n.trim().to_ascii_lowercase())
                .collect();
            format = EventFormat::from_names(&names);
            if format.is_none() {
                warn!("Events format lacks Start, End or Text: '{}'", rest);
            }
        } else if let Some(rest) = strip_key(line, "Dialogue") {
            saw_dialogue = true;
            match format.as_ref().and_then(|f| dialogue(f, rest)) {
                Some(block) => blocks.push(block),
                None => debug!("Skipping dialogue line: '{}'", rest),
            }
        }
    }

    if !saw_dialogue {
        debug!("No dialogue events found, reading as SubRip");
        return srt::parse(&text);
    }
    blocks
}

fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (name, rest) = line.split_once(':')?;
    if name.trim().eq_ignore_ascii_case(key) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn dialogue(format: &EventFormat, rest: &str) -> Option<TimedBlock> {
    // The text field is last and may itself contain commas.
    let fields: Vec<&str> = rest.splitn(format.fields, ',').collect();
    if fields.len() < format.fields {
        return None;
    }
    let text = plain_text(fields[format.text]);
    if text.is_empty() {
        return None;
    }
    Some(TimedBlock::new(
        parse_timecode(fields[format.start]),
        parse_timecode(fields[format.end]),
        text,
    ))
}

/// Drop override blocks and turn ASS escapes into plain lines.
fn plain_text(raw: &str) -> Vec<String> {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' => depth += 1,
            '}' if depth > 0 => depth -= 1,
            _ if depth > 0 => {}
            '\\' => match chars.peek() {
                Some('N') | Some('n') => {
                    chars.next();
                    out.push('\n');
                }
                Some('h') => {
                    chars.next();
                    out.push(' ');
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }
    out.split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "[Script Info]\n\
        Title: test\n\
        ScriptType: v4.00+\n\
        \n\
        [V4+ Styles]\n\
        Format: Name, Fontname, Fontsize\n\
        Style: Default,Arial,20\n\
        \n\
        [Events]\n\
        Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
        Dialogue: 0,0:00:01.00,0:00:03.50,Default,,0,0,0,,{\\i1}Hello{\\i0}, world\n\
        Comment: 0,0:00:02.00,0:00:03.00,Default,,0,0,0,,not shown\n\
        Dialogue: 0,0:00:04.00,0:00:05.00,Default,,0,0,0,,你好\\NHello\n\
        Dialogue: 0,0:00:06.00,0:00:07.00,Default,,0,0,0,,{\\pos(10,10)}\n";

    #[test]
    fn reads_dialogue_events() {
        let blocks = parse(SCRIPT);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].start(), 1.0);
        assert_eq!(blocks[0].end(), 3.5);
        assert_eq!(blocks[0].joined(), "Hello, world");
        assert_eq!(blocks[1].lines(), &["你好".to_string(), "Hello".to_string()]);
    }

    #[test]
    fn respects_custom_field_order() {
        let script = "[Events]\nFormat: Start, End, Text\nDialogue: 0:00:02.00,0:00:04.00,a\\hb\n";
        let blocks = parse(script);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start(), 2.0);
        assert_eq!(blocks[0].joined(), "a b");
    }

    #[test]
    fn ssa_marked_layout() {
        let script = "[Events]\nFormat: Marked, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
                      Dialogue: Marked=0,0:00:10.00,0:00:11.00,*Default,NTP,0000,0000,0000,!Effect,old school\n";
        let blocks = parse(script);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start(), 10.0);
        assert_eq!(blocks[0].joined(), "old school");
    }

    #[test]
    fn short_dialogue_is_skipped() {
        let blocks = parse("[Events]\nDialogue: 0,0:00:01.00\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn falls_back_to_subrip() {
        let blocks = parse("1\n00:00:01,000 --> 00:00:02,000\nmislabelled\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].joined(), "mislabelled");
    }

    #[test]
    fn strips_overrides() {
        assert_eq!(plain_text("{\\b1}bold{\\b0} text"), vec!["bold text"]);
        assert_eq!(plain_text("a\\nb"), vec!["a", "b"]);
        assert_eq!(plain_text("{unclosed"), Vec::<String>::new());
    }
}
