use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The font metric source could not measure a run. This points at a
    /// configuration defect (bad font size, broken face), never at the content.
    #[error("cannot measure {text:?} at {font_size}pt: {reason}")]
    Measure {
        text: String,
        font_size: f32,
        reason: String,
    },

    #[error("font error: {0}")]
    Font(String),

    #[error("PDF error: {0}")]
    Pdf(String),
}

impl Error {
    pub(crate) fn measure(text: &str, font_size: f32, reason: impl Into<String>) -> Self {
        Error::Measure {
            text: text.to_string(),
            font_size,
            reason: reason.into(),
        }
    }
}
