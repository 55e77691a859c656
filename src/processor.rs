use crate::error::ConvertError;
use crate::subtitle::{Document, TimedBlock};

use log::debug;

/// Sort parsed blocks into a document.
///
/// The sort is stable, so blocks starting at the same time keep their
/// parse order. Overlapping or inverted cues are kept untouched.
pub fn normalise(mut blocks: Vec<TimedBlock>) -> Result<Document, ConvertError> {
    if blocks.is_empty() {
        return Err(ConvertError::EmptyContent);
    }
    blocks.sort_by(|a, b| a.start.total_cmp(&b.start));
    debug!("Normalised {} blocks", blocks.len());
    Ok(Document { blocks })
}

/// How translated text is merged into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMode {
    /// Keep the original text and add the translation below it.
    Bilingual,
    /// Replace the original text.
    Rewrite,
}

/// Merge per-block translations into the document, in document order.
///
/// Returns the number of blocks that changed.
pub fn apply_translations(
    doc: &mut Document,
    mode: TranslationMode,
    translations: &[Option<String>],
) -> usize {
    let mut changed = 0;
    for (block, translation) in doc.blocks_mut().iter_mut().zip(translations) {
        let lines: Vec<String> = match translation {
            Some(t) if !t.trim().is_empty() => t.lines().map(String::from).collect(),
            _ => continue,
        };
        match mode {
            TranslationMode::Bilingual => block.text.extend(lines),
            TranslationMode::Rewrite => block.text = lines,
        }
        changed += 1;
    }
    changed
}
