use std::sync::Arc;

use chrono::Utc;
use shared::{
    domain::{DreamSubmission, InterpretationResult},
    protocol::CreateDreamRequest,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    api::DreamApi,
    controller::{FlowController, FlowEvent, SubmissionTicket, ViewPhase, ViewState},
    credentials::CredentialStore,
    error::FlowError,
    mapper::map_analysis_record,
    notify::Notifier,
};

pub const DEFAULT_DREAM_TITLE: &str = "새로운 꿈";
pub const INTERPRETATION_FAILED_NOTICE: &str = "꿈 해석 결과를 불러오지 못했습니다.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank text, or a submission was already in flight.
    Ignored,
    Completed,
    Failed(FlowError),
    /// The submission was superseded before its response arrived.
    Stale,
}

#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub dream_title: String,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            dream_title: DEFAULT_DREAM_TITLE.to_string(),
        }
    }
}

/// Submission invoker for the interpretation screen. Owns the view state and
/// mediates between the text input and the dream service.
pub struct DreamInterpretationFlow {
    api: Arc<dyn DreamApi>,
    credentials: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    settings: FlowSettings,
    controller: Mutex<FlowController>,
}

impl DreamInterpretationFlow {
    pub fn new(
        api: Arc<dyn DreamApi>,
        credentials: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_settings(api, credentials, notifier, FlowSettings::default())
    }

    pub fn with_settings(
        api: Arc<dyn DreamApi>,
        credentials: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            api,
            credentials,
            notifier,
            settings,
            controller: Mutex::new(FlowController::new()),
        }
    }

    pub async fn phase(&self) -> ViewPhase {
        self.controller.lock().await.phase()
    }

    pub async fn snapshot(&self) -> ViewState {
        self.controller.lock().await.state().clone()
    }

    pub async fn result(&self) -> Option<InterpretationResult> {
        self.controller.lock().await.result().cloned()
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.controller.lock().await.subscribe()
    }

    pub async fn set_input(&self, text: impl Into<String>) -> bool {
        self.controller.lock().await.set_input(text)
    }

    pub async fn reset(&self) {
        self.controller.lock().await.reset();
    }

    /// Submits the current draft text.
    pub async fn submit_input(&self) -> SubmitOutcome {
        let text = {
            let controller = self.controller.lock().await;
            controller.input_text().unwrap_or_default().to_string()
        };
        self.submit(&text).await
    }

    /// Runs one interpretation cycle. The controller lock is released while
    /// the request is outstanding so `reset` stays responsive; the ticket
    /// decides whether the completion still applies.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let Some((ticket, submission)) = self.controller.lock().await.begin_submission(text) else {
            return SubmitOutcome::Ignored;
        };
        info!(ticket = ticket.sequence(), "dream submitted for interpretation");

        let outcome = self.interpret(&submission).await;
        self.complete(ticket, outcome).await
    }

    async fn interpret(
        &self,
        submission: &DreamSubmission,
    ) -> Result<InterpretationResult, FlowError> {
        let token = self
            .credentials
            .token()
            .await
            .ok_or(FlowError::MissingCredential)?;
        let request = CreateDreamRequest::new(
            self.settings.dream_title.clone(),
            submission.text(),
            Utc::now(),
        );
        let records = self.api.create_dream(&token, &request).await?;
        map_analysis_record(records.first().and_then(Option::as_ref))
    }

    async fn complete(
        &self,
        ticket: SubmissionTicket,
        outcome: Result<InterpretationResult, FlowError>,
    ) -> SubmitOutcome {
        let mut controller = self.controller.lock().await;
        match outcome {
            Ok(result) => {
                if controller.succeed(ticket, result) {
                    info!(ticket = ticket.sequence(), "dream interpretation ready");
                    SubmitOutcome::Completed
                } else {
                    SubmitOutcome::Stale
                }
            }
            Err(err) => {
                if !controller.fail(ticket) {
                    debug!(ticket = ticket.sequence(), error = %err, "stale failure dropped");
                    return SubmitOutcome::Stale;
                }
                warn!(ticket = ticket.sequence(), error = %err, "dream interpretation failed");
                self.notifier.show_error(INTERPRETATION_FAILED_NOTICE);
                SubmitOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/flow_tests.rs"]
mod tests;
