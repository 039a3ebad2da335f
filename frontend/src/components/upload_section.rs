use super::dom_view::{CATEGORY_ID, FILE_INPUT_ID, FORM_ID, STATUS_ID};
use shared::{DocumentKind, UPLOAD_FIELD};
use strum::IntoEnumIterator;
use yew::prelude::*;

/// The form the upload controller binds to, with its two output regions.
/// Used when the host page does not already provide one.
pub fn render_upload_section() -> Html {
    let accept = DocumentKind::iter()
        .map(|kind| kind.to_string())
        .collect::<Vec<_>>()
        .join(",");

    html! {
        <div class="upload-section">
            <form id={FORM_ID} class="upload-form">
                <div class="upload-area">
                    <div class="upload-placeholder">
                        <i class="fa-solid fa-cloud-arrow-up"></i>
                        <p>{"Choose a resume to analyze"}</p>
                        <p class="file-types">{"Supported formats: PDF, DOC, DOCX"}</p>
                    </div>
                    <input
                        type="file"
                        id={FILE_INPUT_ID}
                        name={UPLOAD_FIELD}
                        accept={accept}
                    />
                </div>

                <button type="submit" class="analyze-btn">{"Predict Category"}</button>
            </form>

            <div id={STATUS_ID} class="result-message"></div>
            <div id={CATEGORY_ID} class="prediction-result"></div>
        </div>
    }
}
