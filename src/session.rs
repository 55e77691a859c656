//! The one subtitle document being worked on, from import to export.

use crate::decode::decode_text;
use crate::error::ConvertError;
use crate::parser::Format;
use crate::processor::{self, TranslationMode};
use crate::serialiser::{self, RenderOpts};
use crate::style::{output_file_name, RenderParams};
use crate::subtitle::Document;
use crate::timecode::{format_timecode, Timebase};

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};

const UNTITLED: &str = "Untitled";

#[derive(Debug, Default)]
pub struct Session {
    document: Option<Document>,
    source_name: Option<String>,
    bilingual: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Base name of the last imported file, without extension.
    pub fn source_name(&self) -> &str {
        self.source_name.as_deref().unwrap_or(UNTITLED)
    }

    /// Whether bilingual translations were merged into the document.
    pub fn is_bilingual(&self) -> bool {
        self.bilingual
    }

    /// Read, decode and parse a subtitle file, selecting the reader by
    /// extension. Returns the number of blocks loaded.
    pub fn import_file(&mut self, path: &Path) -> Result<usize> {
        let format = Format::from_path(path)?;
        let bytes = std::fs::read(path)
            .context(format!("Failed to open input file: '{}'", path.display()))?;
        let (text, encoding) = decode_text(&bytes);
        info!("Reading '{}' as {}", path.display(), encoding.name());

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(UNTITLED);
        let count = self
            .import_text(name, format, &text)
            .context(format!("Failed to import '{}'", path.display()))?;
        Ok(count)
    }

    /// Parse decoded text and replace the current document with it.
    ///
    /// A failed import leaves the previous document in place.
    pub fn import_text(
        &mut self,
        name: &str,
        format: Format,
        text: &str,
    ) -> Result<usize, ConvertError> {
        let blocks = format.parse(text)?;
        let document = processor::normalise(blocks)?;
        let count = document.len();
        debug!(
            "Subtitles run from {} to {}",
            format_timecode(document.blocks()[0].start(), '.'),
            format_timecode(document.last().end(), '.')
        );

        self.document = Some(document);
        self.source_name = Some(name.to_string());
        self.bilingual = false;
        info!("Parsed {} subtitles.", count);
        Ok(count)
    }

    /// Merge translations into the document, one entry per block in
    /// document order.
    pub fn apply_translations(
        &mut self,
        mode: TranslationMode,
        translations: &[Option<String>],
    ) -> Result<usize, ConvertError> {
        let doc = self.document.as_mut().ok_or(ConvertError::NoDocument)?;
        if translations.len() != doc.len() {
            warn!(
                "Got {} translations for {} subtitles",
                translations.len(),
                doc.len()
            );
        }
        let changed = processor::apply_translations(doc, mode, translations);
        if mode == TranslationMode::Bilingual && changed > 0 {
            self.bilingual = true;
        }
        info!("Applied {} translations.", changed);
        Ok(changed)
    }

    pub fn render_opts(&self, timebase: Timebase, bilingual: bool) -> RenderOpts {
        RenderOpts {
            timebase,
            bilingual: bilingual || self.bilingual,
        }
    }

    /// File name the export should be saved under.
    pub fn output_name(&self, opts: RenderOpts) -> String {
        output_file_name(self.source_name(), opts.bilingual)
    }

    pub fn export(&self, params: &RenderParams, opts: RenderOpts) -> Result<String> {
        let doc = self.document.as_ref().ok_or(ConvertError::NothingToExport)?;
        serialiser::render(doc, params, opts)
    }

    pub fn export_to(&self, params: &RenderParams, opts: RenderOpts, path: &Path) -> Result<()> {
        let doc = self.document.as_ref().ok_or(ConvertError::NothingToExport)?;
        serialiser::serialise(doc, params, opts, path)
            .context(format!("Failed to write '{}'", path.display()))?;
        info!("Exported file: {}", path.display());
        Ok(())
    }
}

/// Read translations as a JSON array of strings, where `null` leaves a
/// block untouched.
pub fn parse_translations(json: &str) -> Result<Vec<Option<String>>, ConvertError> {
    serde_json::from_str(json).map_err(|e| ConvertError::InvalidTranslations(e.to_string()))
}
