mod api;
mod components;
mod config;
mod controller;

use components::binding::attach;
use components::dom_view::FORM_ID;
use components::header::render_header;
use components::upload_section::render_upload_section;
use gloo_events::EventListener;
use yew::prelude::*;

// Page shell for when the host page has no upload form of its own
struct App {
    submit_listener: Option<EventListener>,
}

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            submit_listener: None,
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                { render_upload_section() }
                </main>

                <footer class="app-footer">
                    <p>{"Resume Category Prediction | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if !first_render || self.submit_listener.is_some() {
            return;
        }

        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            log::error!("No document available, upload form left unbound");
            return;
        };

        match attach(&document) {
            Ok(listener) => self.submit_listener = Some(listener),
            Err(e) => log::error!("Failed to bind upload form: {}", e),
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");

    let document = web_sys::window().and_then(|window| window.document());
    match document {
        Some(document) if document.get_element_by_id(FORM_ID).is_some() => {
            match attach(&document) {
                Ok(listener) => listener.forget(),
                Err(e) => log::error!("Failed to bind upload form: {}", e),
            }
        }
        _ => {
            yew::Renderer::<App>::new().render();
        }
    }
}
