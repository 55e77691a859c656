use crate::error::ConvertError;
use crate::subtitle::TimedBlock;
use crate::timecode::parse_time_value;

use log::debug;

/// Read `title` elements from a Final Cut Pro XML timeline.
///
/// ```xml
/// <spine>
///   <gap offset="0s" duration="3300/3000s">
///     <title offset="3000/3000s" duration="6000/3000s">
///       <text><text-style ref="ts_0">Hello world</text-style></text>
///     </title>
///   </gap>
/// </spine>
/// ```
///
/// Each title becomes one block spanning `offset .. offset + duration`,
/// with the text of its `text` element. Titles without text are skipped.
pub(super) fn parse(xml: &str) -> Result<Vec<TimedBlock>, ConvertError> {
    // Timelines carry a `<!DOCTYPE fcpxml>` line.
    let opts = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(xml, opts)
        .map_err(|e| ConvertError::MalformedXml(format!("XML parse error: {}", e)))?;

    let blocks = doc
        .descendants()
        .filter(|n| n.has_tag_name("title"))
        .filter_map(|title| {
            let block = title_block(&title);
            if block.is_none() {
                debug!("Skipping title without text: {:?}", title.attribute("name"));
            }
            block
        })
        .collect();
    Ok(blocks)
}

fn title_block(title: &roxmltree::Node) -> Option<TimedBlock> {
    let text_node = title.descendants().find(|n| n.has_tag_name("text"))?;
    let raw: String = text_node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let offset = parse_time_value(title.attribute("offset"));
    let duration = parse_time_value(title.attribute("duration"));
    let lines = raw.split('\n').map(String::from).collect();
    Some(TimedBlock::new(offset, offset + duration, lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMELINE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE fcpxml>
<fcpxml version="1.9">
<library><event><project name="x"><sequence><spine>
<gap name="Gap" offset="0s" duration="9000/3000s" start="0s">
<title name="Sub 0" lane="1" offset="3000/3000s" duration="6000/3000s" start="0s">
<text><text-style ref="ts_0">Tom &amp; &quot;Jerry&quot;</text-style></text>
</title>
<title name="Sub 1" offset="1.5s" duration="0.5s">
<text><text-style ref="a">你好</text-style><text-style ref="b">&#10;Hello</text-style></text>
</title>
<title name="Empty" offset="0s" duration="1s"><text>   </text></title>
<title name="No text" offset="0s" duration="1s"/>
<title name="Untimed"><text>zero</text></title>
</gap>
</spine></sequence></project></event></library>
</fcpxml>"#;

    #[test]
    fn reads_titles() {
        let blocks = parse(TIMELINE).unwrap();
        assert_eq!(blocks.len(), 3);

        assert_eq!(blocks[0].start(), 1.0);
        assert_eq!(blocks[0].end(), 3.0);
        assert_eq!(blocks[0].joined(), "Tom & \"Jerry\"");

        assert_eq!(blocks[1].start(), 1.5);
        assert_eq!(blocks[1].end(), 2.0);
        assert_eq!(blocks[1].lines(), &["你好".to_string(), "Hello".to_string()]);

        assert_eq!(blocks[2].start(), 0.0);
        assert_eq!(blocks[2].end(), 0.0);
    }

    #[test]
    fn ill_formed_xml_is_an_error() {
        match parse("<fcpxml><title>") {
            Err(ConvertError::MalformedXml(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn no_titles() {
        assert!(parse("<fcpxml/>").unwrap().is_empty());
    }
}
