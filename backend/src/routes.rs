use std::path::PathBuf;

use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::{info, warn};
use shared::{DocumentKind, Endpoint, PredictionResponse, UPLOAD_FIELD};
use strum::IntoEnumIterator;

use crate::classifier::extract::document_text;
use crate::classifier::model::Classifier;
use crate::error::ApiError;
use crate::storage::upload_store::UploadStore;

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_bytes: usize,
}

impl UploadLimits {
    fn megabytes(&self) -> usize {
        self.max_bytes.div_ceil(1024 * 1024)
    }
}

struct Upload {
    filename: String,
    data: Vec<u8>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    for endpoint in Endpoint::iter() {
        cfg.service(web::resource(endpoint.path()).route(web::post().to(predict_category)));
    }
}

async fn predict_category(
    payload: Multipart,
    store: web::Data<UploadStore>,
    classifier: web::Data<Classifier>,
    limits: web::Data<UploadLimits>,
) -> Result<HttpResponse, ApiError> {
    let upload = read_upload(payload, **limits).await?;

    if upload.filename.is_empty() {
        return Err(ApiError::NoSelection);
    }
    let Some(kind) = DocumentKind::from_filename(&upload.filename) else {
        warn!("Rejected upload with unsupported name: {}", upload.filename);
        return Err(ApiError::InvalidType);
    };

    let filename = store.save(&upload.filename, &upload.data)?;
    info!("Stored upload {} ({} bytes)", filename, upload.data.len());

    let text = match document_text(kind, &upload.data) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => return Err(ApiError::NoText(filename)),
        Err(e) => {
            warn!("Text extraction failed for {}: {}", filename, e);
            return Err(ApiError::NoText(filename));
        }
    };

    let prediction = classifier.predict(&text)?;
    info!(
        "Predicted {} for {} (score {:.2})",
        prediction.category, filename, prediction.score
    );

    Ok(HttpResponse::Ok().json(PredictionResponse::success(
        format!("\"{}\" analyzed successfully!", filename),
        prediction.category,
    )))
}

/// Reads the document out of the multipart body. Only a `resume` part that
/// carries a filename counts as a file; other parts are skipped. Stops as
/// soon as the document grows past the size limit.
async fn read_upload(mut payload: Multipart, limits: UploadLimits) -> Result<Upload, ApiError> {
    while let Some(mut field) = payload.try_next().await? {
        let (name, filename) = match field.content_disposition() {
            Some(disposition) => (
                disposition.get_name().map(str::to_string),
                disposition.get_filename().map(str::to_string),
            ),
            None => (None, None),
        };

        let Some(filename) = filename.filter(|_| name.as_deref() == Some(UPLOAD_FIELD)) else {
            continue;
        };

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if data.len() + chunk.len() > limits.max_bytes {
                return Err(ApiError::TooLarge(limits.megabytes()));
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(Upload { filename, data });
    }

    Err(ApiError::MissingFile)
}
