use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Unsupported format: '{0}'")]
    UnsupportedFormat(String),
    #[error("Empty content: no subtitles could be read from the input")]
    EmptyContent,
    #[error("Malformed XML: {0}")]
    MalformedXml(String),
    #[error("No subtitles loaded")]
    NoDocument,
    #[error("Nothing to export")]
    NothingToExport,
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("Invalid translations: {0}")]
    InvalidTranslations(String),
}
