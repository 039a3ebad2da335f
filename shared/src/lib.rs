use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Multipart field the document travels under.
pub const UPLOAD_FIELD: &str = "resume";

/// Prediction routes served by the backend. Both take the same upload and
/// answer with a [`PredictionResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, EnumIter, IntoStaticStr)]
pub enum Endpoint {
    #[default]
    #[strum(serialize = "/predict")]
    Predict,
    #[strum(serialize = "/analyze")]
    Analyze,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        (*self).into()
    }
}

/// Document formats accepted for upload, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum DocumentKind {
    #[display(fmt = ".pdf")]
    #[strum(serialize = "pdf")]
    Pdf,
    #[display(fmt = ".doc")]
    #[strum(serialize = "doc")]
    Doc,
    #[display(fmt = ".docx")]
    #[strum(serialize = "docx")]
    Docx,
}

impl DocumentKind {
    /// Looks at the text after the last dot. A name without a dot, or with
    /// nothing after it, has no kind.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        extension.parse().ok()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PredictionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionResponse {
    pub fn success(message: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            category: Some(category.into()),
            error: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
