use actix_multipart::MultipartError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;

use crate::classifier::model::ClassifyError;
use crate::storage::upload_store::StoreError;

/// Everything the prediction route can answer with besides a prediction.
/// Rendered as `{ "error": "<message>" }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file part in the request.")]
    MissingFile,
    #[error("No file selected.")]
    NoSelection,
    #[error("Invalid file type. Please upload a .pdf, .doc, or .docx.")]
    InvalidType,
    #[error("File exceeds the upload size limit of {0} MB.")]
    TooLarge(usize),
    #[error("Error reading upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Error saving file: {0}")]
    Store(#[from] StoreError),
    #[error("Could not extract text from {0}. File might be empty or corrupted.")]
    NoText(String),
    #[error("An error occurred during analysis: {0}")]
    Classify(#[from] ClassifyError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile
            | ApiError::NoSelection
            | ApiError::InvalidType
            | ApiError::Multipart(_)
            | ApiError::NoText(_) => StatusCode::BAD_REQUEST,
            ApiError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Store(_) | ApiError::Classify(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
