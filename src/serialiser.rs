use crate::style::RenderParams;
use crate::subtitle::{Document, TimedBlock};
use crate::timecode::Timebase;

use std::borrow::Cow;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

/// Seconds of empty timeline kept after the last subtitle.
const TRAILING_PADDING: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOpts {
    pub timebase: Timebase,
    /// Render multi-line blocks as a primary line plus a smaller secondary line.
    pub bilingual: bool,
}

pub fn serialise<P: AsRef<Path>>(
    doc: &Document,
    params: &RenderParams,
    opts: RenderOpts,
    output: P,
) -> Result<()> {
    let file = std::fs::File::create(output).context("Failed to create file!")?;
    let mut writer = BufWriter::new(file);
    write_document(&mut writer, doc, params, opts).context("Failed to write to output file.")?;
    writer.flush().context("Failed to write to output file.")?;
    Ok(())
}

/// Render the whole timeline into a string.
pub fn render(doc: &Document, params: &RenderParams, opts: RenderOpts) -> Result<String> {
    let mut buf = Vec::new();
    write_document(&mut buf, doc, params, opts)?;
    Ok(String::from_utf8(buf)?)
}

pub fn write_document<W: Write>(
    buf: &mut W,
    doc: &Document,
    params: &RenderParams,
    opts: RenderOpts,
) -> Result<()> {
    let tb = opts.timebase;
    let total_frames = ((doc.last().end() + TRAILING_PADDING) * f64::from(tb.fps)).ceil() as i64;
    let duration = tb.rational(total_frames);
    debug!(
        "Rendering {} titles over {} frames at {} fps",
        doc.len(),
        total_frames,
        tb.fps
    );

    writeln!(buf, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(buf, "<!DOCTYPE fcpxml>")?;
    writeln!(buf, r#"<fcpxml version="1.9">"#)?;
    writeln!(buf, "<resources>")?;
    writeln!(
        buf,
        r#"<format id="r1" name="FFVideoFormat1080p{}" frameDuration="{}" width="1920" height="1080" colorSpace="1-1-1 (Rec. 709)"/>"#,
        tb.fps,
        tb.frame_duration()
    )?;
    writeln!(
        buf,
        r#"<effect id="fx_custom" name="Custom" uid=".../Titles.localized/Build In:Out.localized/Custom.localized/Custom.moti"/>"#
    )?;
    writeln!(buf, "</resources>")?;
    writeln!(buf, "<library>")?;
    writeln!(buf, r#"<event name="Subtitle Import">"#)?;
    writeln!(buf, r#"<project name="{}">"#, escape(&params.file_name))?;
    writeln!(
        buf,
        r#"<sequence format="r1" duration="{}" tcStart="0s" tcFormat="NDF" audioLayout="stereo" audioRate="48k">"#,
        duration
    )?;
    writeln!(buf, "<spine>")?;
    writeln!(
        buf,
        r#"<gap name="Gap" offset="0s" duration="{}" start="0s">"#,
        duration
    )?;
    for (index, block) in doc.blocks().iter().enumerate() {
        write_title(buf, index, block, params, opts)?;
    }
    write!(
        buf,
        "</gap>\n</spine>\n</sequence>\n</project>\n</event>\n</library>\n</fcpxml>"
    )?;
    Ok(())
}

/// Start frame and length in frames. Cues that round to zero length or
/// end before they start still last one frame.
fn frame_span(block: &TimedBlock, tb: Timebase) -> (i64, i64) {
    let start = tb.to_frame(block.start());
    let end = tb.to_frame(block.end()).max(start.saturating_add(1));
    (start, end.saturating_sub(start))
}

fn write_title<W: Write>(
    buf: &mut W,
    index: usize,
    block: &TimedBlock,
    params: &RenderParams,
    opts: RenderOpts,
) -> Result<()> {
    let (start, length) = frame_span(block, opts.timebase);
    writeln!(
        buf,
        r#"<title name="Sub {}" lane="1" offset="{}" ref="fx_custom" duration="{}" start="0s">"#,
        index,
        opts.timebase.rational(start),
        opts.timebase.rational(length)
    )?;
    writeln!(
        buf,
        r#"<param name="Position" key="9999/10199/10201/1/100/101" value="0 {}"/>"#,
        params.position
    )?;

    match block.lines() {
        [primary, secondary @ ..] if opts.bilingual && !secondary.is_empty() => {
            let primary_id = format!("ts_pri_{}", index);
            let secondary_id = format!("ts_sec_{}", index);
            writeln!(
                buf,
                r#"<text><text-style ref="{}">{}</text-style><text-style ref="{}">&#10;{}</text-style></text>"#,
                primary_id,
                escape(primary),
                secondary_id,
                escape(&secondary.join(" "))
            )?;
            write_style_def(buf, &primary_id, params.font_size, params)?;
            write_style_def(buf, &secondary_id, params.secondary_font_size(), params)?;
        }
        _ => {
            let id = format!("ts_{}", index);
            writeln!(
                buf,
                r#"<text><text-style ref="{}">{}</text-style></text>"#,
                id,
                escape(&block.joined())
            )?;
            write_style_def(buf, &id, params.font_size, params)?;
        }
    }
    writeln!(buf)?;
    writeln!(buf, "</title>")?;
    Ok(())
}

fn write_style_def<W: Write>(buf: &mut W, id: &str, size: u32, params: &RenderParams) -> Result<()> {
    write!(
        buf,
        r#"<text-style-def id="{}"><text-style font="{}" fontSize="{}" fontFace="Regular" fontColor="{}" strokeColor="{}" strokeWidth="{}" alignment="center"/></text-style-def>"#,
        id,
        escape(&params.font_name),
        size,
        params.font_color,
        params.stroke_color,
        params.stroke_width
    )?;
    Ok(())
}

/// Escape `&`, `<`, `>` and `"`. Apostrophes are left as they are.
fn escape(text: &str) -> Cow<str> {
    if !text.contains(|c: char| matches!(c, '&' | '<' | '>' | '"')) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
