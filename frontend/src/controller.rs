//! The upload form's submission flow.
//!
//! One attempt runs `Idle -> Submitting -> {Succeeded, Failed} -> Idle`.
//! The trigger button is disabled for the whole time a request is out and
//! handed back by `SubmissionGuard` when the attempt ends, whichever way
//! it ends.

use std::cell::Cell;

use futures::future::LocalBoxFuture;
use shared::PredictionResponse;
use thiserror::Error;

use crate::config::ControllerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("{}", describe_status(.status, .reason))]
    Transport { status: u16, reason: Option<String> },
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("{0}")]
    Application(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Could not read the form: {0}")]
    Form(String),
}

fn describe_status(status: &u16, reason: &Option<String>) -> String {
    match reason {
        Some(reason) => reason.clone(),
        None => format!("Server responded with status: {}", status),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// A request was already outstanding; nothing was touched.
    Ignored,
    MissingFile,
    Completed(PredictionResponse),
    Failed(SubmitError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The page surface the controller reads from and writes to.
pub trait UploadView {
    /// Multipart body built from the form's fields.
    type Body;

    fn trigger_enabled(&self) -> bool;
    fn trigger_label(&self) -> String;
    fn set_trigger(&self, enabled: bool, label: &str);
    fn has_selected_file(&self) -> bool;
    fn form_body(&self) -> Result<Self::Body, SubmitError>;
    fn set_status(&self, text: &str, color: &str);
    fn set_category(&self, text: &str);
    fn reset_file_input(&self);
}

pub trait Transport<B> {
    /// Only network-level failures are errors here; any HTTP status comes
    /// back as a [`RawResponse`].
    fn post(&self, path: &str, body: B) -> LocalBoxFuture<'static, Result<RawResponse, SubmitError>>;
}

/// Turns a finished exchange into what the page should show.
pub fn interpret(response: RawResponse) -> Result<PredictionResponse, SubmitError> {
    if !response.is_success() {
        let reason = serde_json::from_str::<PredictionResponse>(&response.body)
            .ok()
            .and_then(|payload| payload.error);
        return Err(SubmitError::Transport {
            status: response.status,
            reason,
        });
    }

    let prediction: PredictionResponse = serde_json::from_str(&response.body)
        .map_err(|e| SubmitError::Decode(e.to_string()))?;

    match prediction.error {
        Some(error) => Err(SubmitError::Application(error)),
        None => Ok(prediction),
    }
}

pub struct UploadController<V, T> {
    config: ControllerConfig,
    view: V,
    transport: T,
    phase: Cell<Phase>,
}

impl<V, T> UploadController<V, T>
where
    V: UploadView,
    T: Transport<V::Body>,
{
    pub fn new(config: ControllerConfig, view: V, transport: T) -> Self {
        Self {
            config,
            view,
            transport,
            phase: Cell::new(Phase::Idle),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub async fn submit(&self) -> AttemptOutcome {
        if !self.view.trigger_enabled() {
            log::debug!("Submit ignored, an upload is already in flight");
            return AttemptOutcome::Ignored;
        }

        self.show(&self.config.messages.in_progress, Tone::Pending);
        self.view.set_category("");

        if !self.view.has_selected_file() {
            log::warn!("Submit without a selected file");
            self.show(&self.config.messages.missing_file, Tone::Error);
            return AttemptOutcome::MissingFile;
        }

        let guard = SubmissionGuard::engage(&self.view, &self.phase, &self.config);

        match self.exchange().await {
            Ok(prediction) => {
                self.render_prediction(&prediction);
                guard.finish(Phase::Succeeded);
                AttemptOutcome::Completed(prediction)
            }
            Err(error) => {
                self.render_failure(&error);
                guard.finish(Phase::Failed);
                AttemptOutcome::Failed(error)
            }
        }
    }

    async fn exchange(&self) -> Result<PredictionResponse, SubmitError> {
        let body = self.view.form_body()?;
        log::info!("Posting upload to {}", self.config.endpoint);
        let response = self.transport.post(&self.config.endpoint, body).await?;
        log::debug!("Upload answered with status {}", response.status);
        interpret(response)
    }

    fn render_prediction(&self, prediction: &PredictionResponse) {
        if let Some(message) = &prediction.message {
            self.show(message, Tone::Success);
        }

        if let Some(category) = &prediction.category {
            self.view.set_category(&self.config.category_text(category));
        }
    }

    fn render_failure(&self, error: &SubmitError) {
        log::error!("Upload failed: {}", error);
        self.show(&format!("Error: {}", error), Tone::Error);
        self.view.set_category("");
    }

    fn show(&self, text: &str, tone: Tone) {
        let palette = &self.config.palette;
        let color = match tone {
            Tone::Pending => &palette.pending,
            Tone::Success => &palette.success,
            Tone::Error => &palette.error,
        };
        self.view.set_status(text, color);
    }
}

/// Holds the trigger disabled while alive. Dropping it re-enables the
/// trigger with the label it had before, applies the reset policy and
/// returns the controller to `Idle`.
struct SubmissionGuard<'a, V: UploadView> {
    view: &'a V,
    phase: &'a Cell<Phase>,
    config: &'a ControllerConfig,
    idle_label: String,
}

impl<'a, V: UploadView> SubmissionGuard<'a, V> {
    fn engage(view: &'a V, phase: &'a Cell<Phase>, config: &'a ControllerConfig) -> Self {
        let idle_label = view.trigger_label();
        view.set_trigger(false, &config.messages.busy_label);
        phase.set(Phase::Submitting);
        Self {
            view,
            phase,
            config,
            idle_label,
        }
    }

    fn finish(&self, phase: Phase) {
        self.phase.set(phase);
    }
}

impl<V: UploadView> Drop for SubmissionGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_trigger(true, &self.idle_label);
        if self.config.reset_policy.applies(self.phase.get() == Phase::Succeeded) {
            self.view.reset_file_input();
        }
        self.phase.set(Phase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControllerConfig, ResetPolicy};
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    const IDLE_LABEL: &str = "Predict Category";

    #[derive(Debug, Clone, PartialEq)]
    struct Screen {
        status: String,
        color: String,
        category: String,
        trigger_enabled: bool,
        trigger_label: String,
        has_file: bool,
        form_error: Option<String>,
        resets: usize,
    }

    impl Default for Screen {
        fn default() -> Self {
            Self {
                status: String::new(),
                color: String::new(),
                category: "stale category".to_string(),
                trigger_enabled: true,
                trigger_label: IDLE_LABEL.to_string(),
                has_file: true,
                form_error: None,
                resets: 0,
            }
        }
    }

    #[derive(Clone, Default)]
    struct FakeView(Rc<RefCell<Screen>>);

    impl UploadView for FakeView {
        type Body = String;

        fn trigger_enabled(&self) -> bool {
            self.0.borrow().trigger_enabled
        }

        fn trigger_label(&self) -> String {
            self.0.borrow().trigger_label.clone()
        }

        fn set_trigger(&self, enabled: bool, label: &str) {
            let mut screen = self.0.borrow_mut();
            screen.trigger_enabled = enabled;
            screen.trigger_label = label.to_string();
        }

        fn has_selected_file(&self) -> bool {
            self.0.borrow().has_file
        }

        fn form_body(&self) -> Result<String, SubmitError> {
            match &self.0.borrow().form_error {
                Some(reason) => Err(SubmitError::Form(reason.clone())),
                None => Ok("resume=cv.pdf".to_string()),
            }
        }

        fn set_status(&self, text: &str, color: &str) {
            let mut screen = self.0.borrow_mut();
            screen.status = text.to_string();
            screen.color = color.to_string();
        }

        fn set_category(&self, text: &str) {
            self.0.borrow_mut().category = text.to_string();
        }

        fn reset_file_input(&self) {
            let mut screen = self.0.borrow_mut();
            screen.has_file = false;
            screen.resets += 1;
        }
    }

    /// Replays one scripted reply and records what the screen looked like
    /// while the request was out.
    struct ScriptedTransport {
        screen: Rc<RefCell<Screen>>,
        reply: Result<RawResponse, SubmitError>,
        paths: Rc<RefCell<Vec<String>>>,
        seen_while_pending: Rc<RefCell<Vec<(bool, String)>>>,
    }

    impl Transport<String> for ScriptedTransport {
        fn post(&self, path: &str, _body: String) -> LocalBoxFuture<'static, Result<RawResponse, SubmitError>> {
            self.paths.borrow_mut().push(path.to_string());
            let screen = Rc::clone(&self.screen);
            let seen = Rc::clone(&self.seen_while_pending);
            let reply = self.reply.clone();
            Box::pin(async move {
                let snapshot = screen.borrow();
                seen.borrow_mut()
                    .push((snapshot.trigger_enabled, snapshot.trigger_label.clone()));
                reply
            })
        }
    }

    struct Harness {
        controller: UploadController<FakeView, ScriptedTransport>,
        screen: Rc<RefCell<Screen>>,
        paths: Rc<RefCell<Vec<String>>>,
        seen_while_pending: Rc<RefCell<Vec<(bool, String)>>>,
    }

    impl Harness {
        fn new(config: ControllerConfig, reply: Result<RawResponse, SubmitError>) -> Self {
            let view = FakeView::default();
            let screen = Rc::clone(&view.0);
            let paths = Rc::new(RefCell::new(Vec::new()));
            let seen_while_pending = Rc::new(RefCell::new(Vec::new()));
            let transport = ScriptedTransport {
                screen: Rc::clone(&screen),
                reply,
                paths: Rc::clone(&paths),
                seen_while_pending: Rc::clone(&seen_while_pending),
            };
            Self {
                controller: UploadController::new(config, view, transport),
                screen,
                paths,
                seen_while_pending,
            }
        }

        fn replying(status: u16, body: &str) -> Self {
            Self::new(
                ControllerConfig::default(),
                Ok(RawResponse {
                    status,
                    body: body.to_string(),
                }),
            )
        }

        fn submit(&self) -> AttemptOutcome {
            block_on(self.controller.submit())
        }

        fn screen(&self) -> Screen {
            self.screen.borrow().clone()
        }

        fn assert_released(&self) {
            let screen = self.screen();
            assert!(screen.trigger_enabled);
            assert_eq!(screen.trigger_label, IDLE_LABEL);
            assert_eq!(self.controller.phase(), Phase::Idle);
            for (enabled, label) in self.seen_while_pending.borrow().iter() {
                assert!(!enabled);
                assert_eq!(label, "Analyzing...");
            }
        }
    }

    #[test]
    fn missing_file_stops_before_the_network() {
        let harness = Harness::replying(200, r#"{"message":"Done"}"#);
        harness.screen.borrow_mut().has_file = false;

        assert_eq!(harness.submit(), AttemptOutcome::MissingFile);

        let screen = harness.screen();
        assert_eq!(screen.status, "Please select a file to upload.");
        assert_eq!(screen.color, "#f87171");
        assert_eq!(screen.category, "");
        assert!(screen.trigger_enabled);
        assert!(harness.paths.borrow().is_empty());
    }

    #[test]
    fn success_shows_message_and_category() {
        let harness = Harness::replying(200, r#"{"message":"Done","category":"Engineering"}"#);

        let outcome = harness.submit();

        assert_eq!(
            outcome,
            AttemptOutcome::Completed(PredictionResponse::success("Done", "Engineering"))
        );
        let screen = harness.screen();
        assert_eq!(screen.status, "Done");
        assert_eq!(screen.color, "#6ee7b7");
        assert_eq!(screen.category, "Engineering");
        assert_eq!(harness.paths.borrow().as_slice(), ["/predict"]);
        assert_eq!(harness.seen_while_pending.borrow().len(), 1);
        harness.assert_released();
    }

    #[test]
    fn category_prefix_and_endpoint_come_from_config() {
        let config = ControllerConfig {
            endpoint: "/analyze".to_string(),
            category_prefix: Some("Predicted Category: ".to_string()),
            ..ControllerConfig::default()
        };
        let harness = Harness::new(
            config,
            Ok(RawResponse {
                status: 200,
                body: r#"{"message":"Done","category":"Engineering"}"#.to_string(),
            }),
        );

        harness.submit();

        assert_eq!(harness.screen().category, "Predicted Category: Engineering");
        assert_eq!(harness.paths.borrow().as_slice(), ["/analyze"]);
    }

    #[test]
    fn success_without_message_keeps_progress_status() {
        let harness = Harness::replying(200, r#"{"category":"Sales"}"#);

        harness.submit();

        let screen = harness.screen();
        assert_eq!(screen.status, "Uploading and analyzing...");
        assert_eq!(screen.color, "#a5b4fc");
        assert_eq!(screen.category, "Sales");
        harness.assert_released();
    }

    #[test]
    fn unreadable_form_is_reported_and_releases_the_trigger() {
        let harness = Harness::replying(200, r#"{"message":"Done"}"#);
        harness.screen.borrow_mut().form_error = Some("form detached".to_string());

        let outcome = harness.submit();

        assert_eq!(
            outcome,
            AttemptOutcome::Failed(SubmitError::Form("form detached".to_string()))
        );
        assert!(harness.paths.borrow().is_empty());
        let screen = harness.screen();
        assert!(screen.status.starts_with("Error: "));
        assert!(screen.status.contains("form detached"));
        assert_eq!(screen.color, "#f87171");
        assert_eq!(screen.category, "");
        harness.assert_released();
    }

    #[test]
    fn server_error_reason_is_surfaced() {
        let harness = Harness::replying(400, r#"{"error":"bad file"}"#);

        let outcome = harness.submit();

        assert_eq!(
            outcome,
            AttemptOutcome::Failed(SubmitError::Transport {
                status: 400,
                reason: Some("bad file".to_string()),
            })
        );
        let screen = harness.screen();
        assert!(screen.status.contains("bad file"));
        assert_eq!(screen.color, "#f87171");
        assert_eq!(screen.category, "");
        harness.assert_released();
    }

    #[test]
    fn unparseable_server_error_mentions_status_code() {
        let harness = Harness::replying(500, "<html>Internal Server Error</html>");

        harness.submit();

        let screen = harness.screen();
        assert_eq!(screen.status, "Error: Server responded with status: 500");
        assert_eq!(screen.category, "");
        harness.assert_released();
    }

    #[test]
    fn error_field_in_success_response_is_an_error() {
        let harness = Harness::replying(200, r#"{"error":"model unavailable"}"#);

        let outcome = harness.submit();

        assert_eq!(
            outcome,
            AttemptOutcome::Failed(SubmitError::Application("model unavailable".to_string()))
        );
        let screen = harness.screen();
        assert_eq!(screen.status, "Error: model unavailable");
        assert_eq!(screen.color, "#f87171");
        assert_eq!(screen.category, "");
        harness.assert_released();
    }

    #[test]
    fn error_field_wins_over_category() {
        let harness = Harness::replying(200, r#"{"category":"HR","error":"low confidence"}"#);

        harness.submit();

        let screen = harness.screen();
        assert!(screen.status.contains("low confidence"));
        assert_eq!(screen.category, "");
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let harness = Harness::replying(200, "not json");

        let outcome = harness.submit();

        assert!(matches!(outcome, AttemptOutcome::Failed(SubmitError::Decode(_))));
        let screen = harness.screen();
        assert!(screen.status.starts_with("Error: Failed to parse response"));
        assert_eq!(screen.category, "");
        harness.assert_released();
    }

    #[test]
    fn network_failure_is_reported_and_trigger_released() {
        let harness = Harness::new(
            ControllerConfig::default(),
            Err(SubmitError::Network("Failed to fetch".to_string())),
        );

        harness.submit();

        let screen = harness.screen();
        assert_eq!(screen.status, "Error: Network error: Failed to fetch");
        assert_eq!(screen.color, "#f87171");
        assert_eq!(screen.category, "");
        harness.assert_released();
    }

    #[test]
    fn submit_while_busy_is_ignored() {
        let harness = Harness::replying(200, r#"{"message":"Done"}"#);
        {
            let mut screen = harness.screen.borrow_mut();
            screen.trigger_enabled = false;
            screen.status = "Uploading and analyzing...".to_string();
        }

        assert_eq!(harness.submit(), AttemptOutcome::Ignored);
        assert_eq!(harness.screen().status, "Uploading and analyzing...");
        assert!(harness.paths.borrow().is_empty());
    }

    #[test]
    fn repeated_submissions_leave_the_same_screen() {
        let harness = Harness::replying(200, r#"{"message":"Done","category":"Engineering"}"#);

        harness.submit();
        let first = harness.screen();
        harness.submit();
        let second = harness.screen();

        assert_eq!(first, second);
        assert_eq!(harness.paths.borrow().len(), 2);
    }

    #[test]
    fn file_input_is_kept_by_default() {
        let harness = Harness::replying(200, r#"{"message":"Done"}"#);

        harness.submit();

        let screen = harness.screen();
        assert_eq!(screen.resets, 0);
        assert!(screen.has_file);
    }

    #[test]
    fn reset_after_success_skips_failures() {
        let config = ControllerConfig {
            reset_policy: ResetPolicy::AfterSuccess,
            ..ControllerConfig::default()
        };
        let failing = Harness::new(
            config.clone(),
            Err(SubmitError::Network("offline".to_string())),
        );
        failing.submit();
        assert_eq!(failing.screen().resets, 0);

        let succeeding = Harness::new(
            config,
            Ok(RawResponse {
                status: 200,
                body: r#"{"message":"Done"}"#.to_string(),
            }),
        );
        succeeding.submit();
        assert_eq!(succeeding.screen().resets, 1);
    }

    #[test]
    fn reset_always_clears_after_failure() {
        let config = ControllerConfig {
            reset_policy: ResetPolicy::Always,
            ..ControllerConfig::default()
        };
        let harness = Harness::new(config, Err(SubmitError::Network("offline".to_string())));

        harness.submit();

        assert_eq!(harness.screen().resets, 1);
        harness.assert_released();
    }

    #[test]
    fn non_string_error_payload_falls_back_to_status() {
        let error = interpret(RawResponse {
            status: 502,
            body: r#"{"error":{"code":7}}"#.to_string(),
        })
        .unwrap_err();

        assert_eq!(error.to_string(), "Server responded with status: 502");
    }
}
