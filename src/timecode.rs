use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit0, digit1, space0};
use nom::combinator::{all_consuming, map_res, opt, recognize};
use nom::error::VerboseError;
use nom::multi::many_m_n;
use nom::sequence::{delimited, pair, separated_pair, terminated, tuple};
use nom::IResult;

use log::warn;

/// Largest time accepted from input, in seconds (100 000 hours).
pub const MAX_SECONDS: f64 = 360_000_000.0;

/// Frame rate of the generated timeline.
///
/// A frame lasts `100 / (fps * 100)` seconds, which at the default of
/// 30 fps gives the `100/3000s` frame duration editors expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timebase {
    pub fps: u32,
}

impl Default for Timebase {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

impl Timebase {
    pub fn new(fps: u32) -> Self {
        Self { fps: fps.max(1) }
    }

    pub fn to_frame(&self, seconds: f64) -> i64 {
        to_frame(seconds, self.fps)
    }

    /// Rational time string for a frame count, e.g. `90*100/3000s` as `9000/3000s`.
    pub fn rational(&self, frames: i64) -> String {
        format!(
            "{}/{}s",
            frames.saturating_mul(100),
            u64::from(self.fps) * 100
        )
    }

    pub fn frame_duration(&self) -> String {
        self.rational(1)
    }
}

/// Nearest frame index for a time in seconds.
pub fn to_frame(seconds: f64, fps: u32) -> i64 {
    (seconds * f64::from(fps)).round() as i64
}

/// Parse a cue timestamp such as `01:02:03,456`, `02:03.456` or `3.5`.
///
/// Malformed input is not an error: it is logged and read as zero.
pub fn parse_timecode(raw: &str) -> f64 {
    match try_parse_timecode(raw) {
        Some(seconds) => seconds,
        None => {
            warn!("Unreadable timecode '{}', using 0", raw.trim());
            0.0
        }
    }
}

pub fn try_parse_timecode(raw: &str) -> Option<f64> {
    let normalised = raw.trim().replace(',', ".");
    let parsed = all_consuming(timecode)(normalised.as_str())
        .ok()
        .map(|(_, seconds)| seconds)
        .filter(|s| in_range(*s));
    parsed
}

fn in_range(seconds: f64) -> bool {
    seconds.is_finite() && seconds.abs() <= MAX_SECONDS
}

/// Parse a Timeline-XML time attribute: `1001/30000s`, `3.5s` or `0s`.
///
/// Missing or malformed values are read as zero.
pub fn parse_time_value(raw: Option<&str>) -> f64 {
    let raw = match raw {
        Some(raw) => raw,
        None => return 0.0,
    };
    match all_consuming(time_value)(raw.trim()) {
        Ok((_, seconds)) if in_range(seconds) => seconds,
        _ => {
            warn!("Unreadable time value '{}', using 0", raw);
            0.0
        }
    }
}

/// Format seconds as `HH:MM:SS<sep>mmm`.
pub fn format_timecode(seconds: f64, separator: char) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, minutes, secs, separator, millis
    )
}

fn timecode(input: &str) -> IResult<&str, f64, VerboseError<&str>> {
    let (input, prefix) = many_m_n(0, 2, terminated(whole, char(':')))(input)?;
    let (input, seconds) = unsigned_decimal(input)?;

    let (hours, minutes) = match prefix.as_slice() {
        [h, m] => (*h, *m),
        [m] => (0, *m),
        _ => (0, 0),
    };
    Ok((input, hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds))
}

fn time_value(input: &str) -> IResult<&str, f64, VerboseError<&str>> {
    let rational = map_res(
        separated_pair(signed_whole, delimited(space0, char('/'), space0), whole),
        |(num, den): (i64, u64)| {
            if den == 0 {
                Err("zero denominator")
            } else {
                Ok(num as f64 / den as f64)
            }
        },
    );
    terminated(alt((rational, decimal)), opt(tag("s")))(input)
}

fn whole(input: &str) -> IResult<&str, u64, VerboseError<&str>> {
    map_res(digit1, str::parse)(input)
}

fn signed_whole(input: &str) -> IResult<&str, i64, VerboseError<&str>> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse)(input)
}

fn unsigned_decimal(input: &str) -> IResult<&str, f64, VerboseError<&str>> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        str::parse,
    )(input)
}

/// Timeline times may be negative, cue timestamps may not.
fn decimal(input: &str) -> IResult<&str, f64, VerboseError<&str>> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit0)),
        ))),
        str::parse,
    )(input)
}
