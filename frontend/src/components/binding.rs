use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use super::dom_view::{BindError, DomView};
use crate::api::FetchTransport;
use crate::config::ControllerConfig;
use crate::controller::UploadController;

/// Binds the upload controller to the form in `document`. The returned
/// listener owns the controller; dropping it detaches the form.
pub fn attach(document: &Document) -> Result<EventListener, BindError> {
    let view = DomView::bind(document)?;
    let config = ControllerConfig::from_attributes(|name| view.form().get_attribute(name));
    let form = view.form().clone();

    let controller = Rc::new(UploadController::new(config, view, FetchTransport));
    log::info!(
        "Upload form bound, posting to {}",
        controller.config().endpoint
    );

    Ok(EventListener::new(&form, "submit", move |event| {
        event.prevent_default();

        let controller = Rc::clone(&controller);
        spawn_local(async move {
            let outcome = controller.submit().await;
            log::debug!("Upload attempt finished: {:?}", outcome);
        });
    }))
}
