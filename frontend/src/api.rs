use futures::future::LocalBoxFuture;
use gloo_console::error;
use gloo_net::http::Request;
use web_sys::FormData;

use crate::controller::{RawResponse, SubmitError, Transport};

/// Posts the form with the browser's fetch.
#[derive(Clone, Copy, Default)]
pub struct FetchTransport;

impl Transport<FormData> for FetchTransport {
    fn post(&self, path: &str, body: FormData) -> LocalBoxFuture<'static, Result<RawResponse, SubmitError>> {
        let path = path.to_owned();

        Box::pin(async move {
            let request = Request::post(&path).body(body).map_err(network_error)?;

            let response = request.send().await.map_err(|err| {
                error!(format!("Fetch error: {:?}", err));
                network_error(err)
            })?;

            let status = response.status();
            let body = response.text().await.map_err(network_error)?;

            Ok(RawResponse { status, body })
        })
    }
}

fn network_error(err: gloo_net::Error) -> SubmitError {
    SubmitError::Network(err.to_string())
}
