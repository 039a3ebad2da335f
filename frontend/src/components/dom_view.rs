use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, FormData, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
};

use crate::controller::{SubmitError, UploadView};

pub const FORM_ID: &str = "upload-form";
pub const FILE_INPUT_ID: &str = "resume-file";
pub const STATUS_ID: &str = "result";
pub const CATEGORY_ID: &str = "prediction-result";

const TRIGGER_SELECTOR: &str = "button[type=\"submit\"]";
const BUSY_CLASSES: [&str; 2] = ["opacity-50", "cursor-not-allowed"];

#[derive(Debug, Error)]
pub enum BindError {
    #[error("element #{0} is missing from the page")]
    Missing(&'static str),
    #[error("element #{0} is not a {1}")]
    WrongKind(&'static str, &'static str),
    #[error("form #{} has no submit button", FORM_ID)]
    NoTrigger,
}

/// Handles to the elements of a rendered upload form.
#[derive(Clone)]
pub struct DomView {
    form: HtmlFormElement,
    file_input: HtmlInputElement,
    trigger: HtmlButtonElement,
    status: HtmlElement,
    category: HtmlElement,
}

impl DomView {
    pub fn bind(document: &Document) -> Result<Self, BindError> {
        let form: HtmlFormElement = find(document, FORM_ID, "form")?;
        let file_input: HtmlInputElement = find(document, FILE_INPUT_ID, "input")?;
        let status: HtmlElement = find(document, STATUS_ID, "HTML element")?;
        let category: HtmlElement = find(document, CATEGORY_ID, "HTML element")?;

        let trigger = form
            .query_selector(TRIGGER_SELECTOR)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok())
            .ok_or(BindError::NoTrigger)?;

        Ok(Self {
            form,
            file_input,
            trigger,
            status,
            category,
        })
    }

    pub fn form(&self) -> &HtmlFormElement {
        &self.form
    }
}

fn find<T: JsCast>(document: &Document, id: &'static str, kind: &'static str) -> Result<T, BindError> {
    document
        .get_element_by_id(id)
        .ok_or(BindError::Missing(id))?
        .dyn_into::<T>()
        .map_err(|_| BindError::WrongKind(id, kind))
}

impl UploadView for DomView {
    type Body = FormData;

    fn trigger_enabled(&self) -> bool {
        !self.trigger.disabled()
    }

    fn trigger_label(&self) -> String {
        self.trigger.text_content().unwrap_or_default()
    }

    fn set_trigger(&self, enabled: bool, label: &str) {
        self.trigger.set_disabled(!enabled);
        self.trigger.set_text_content(Some(label));

        let classes = self.trigger.class_list();
        for class in BUSY_CLASSES {
            let toggled = if enabled {
                classes.remove_1(class)
            } else {
                classes.add_1(class)
            };
            if toggled.is_err() {
                log::warn!("Could not toggle class {} on the submit button", class);
            }
        }
    }

    fn has_selected_file(&self) -> bool {
        self.file_input
            .files()
            .and_then(|files| files.item(0))
            .is_some()
    }

    fn form_body(&self) -> Result<FormData, SubmitError> {
        FormData::new_with_form(&self.form).map_err(|e| SubmitError::Form(format!("{:?}", e)))
    }

    fn set_status(&self, text: &str, color: &str) {
        self.status.set_text_content(Some(text));
        if self.status.style().set_property("color", color).is_err() {
            log::warn!("Could not set status color to {}", color);
        }
    }

    fn set_category(&self, text: &str) {
        self.category.set_text_content(Some(text));
    }

    fn reset_file_input(&self) {
        self.file_input.set_value("");
    }
}
