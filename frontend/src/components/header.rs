use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-file-lines"></i> {" Resume Category Prediction"}</h1>
            <p class="subtitle">{"Upload a resume to find the job category it fits best"}</p>
        </header>
    }
}
