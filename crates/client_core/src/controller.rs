//! View state machine of the dream interpretation screen.
//!
//! `Input --submit--> Loading --succeed--> Results --reset--> Input`, with
//! `Loading --fail--> Input`. Transitions that do not apply to the current
//! phase are ignored.

use shared::domain::{DreamSubmission, InterpretationResult};
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPhase {
    Input,
    Loading,
    Results,
}

/// Identifies one accepted submission. Completions carrying a ticket other
/// than the one currently loading are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionTicket(u64);

impl SubmissionTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Input {
        text: String,
    },
    Loading {
        ticket: SubmissionTicket,
        submission: DreamSubmission,
    },
    Results {
        result: InterpretationResult,
    },
}

impl ViewState {
    pub fn phase(&self) -> ViewPhase {
        match self {
            Self::Input { .. } => ViewPhase::Input,
            Self::Loading { .. } => ViewPhase::Loading,
            Self::Results { .. } => ViewPhase::Results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    PhaseChanged {
        phase: ViewPhase,
        ticket: Option<SubmissionTicket>,
    },
    StaleCompletionDropped {
        ticket: SubmissionTicket,
    },
}

pub struct FlowController {
    state: ViewState,
    next_sequence: u64,
    events: broadcast::Sender<FlowEvent>,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowController {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: ViewState::Input {
                text: String::new(),
            },
            next_sequence: 1,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> ViewPhase {
        self.state.phase()
    }

    pub fn input_text(&self) -> Option<&str> {
        match &self.state {
            ViewState::Input { text } => Some(text),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&InterpretationResult> {
        match &self.state {
            ViewState::Results { result } => Some(result),
            _ => None,
        }
    }

    pub fn in_flight(&self) -> Option<SubmissionTicket> {
        match &self.state {
            ViewState::Loading { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    pub fn is_current(&self, ticket: SubmissionTicket) -> bool {
        self.in_flight() == Some(ticket)
    }

    /// Updates the draft text. Only meaningful while in `Input`.
    pub fn set_input(&mut self, value: impl Into<String>) -> bool {
        match &mut self.state {
            ViewState::Input { text } => {
                *text = value.into();
                true
            }
            _ => false,
        }
    }

    /// Moves `Input -> Loading` for non-blank text and hands out the ticket
    /// the completion must present.
    pub fn begin_submission(&mut self, text: &str) -> Option<(SubmissionTicket, DreamSubmission)> {
        if self.phase() != ViewPhase::Input {
            debug!(phase = ?self.phase(), "submission ignored: not accepting input");
            return None;
        }
        let Some(submission) = DreamSubmission::new(text) else {
            debug!("submission ignored: blank dream text");
            return None;
        };

        let ticket = SubmissionTicket(self.next_sequence);
        self.next_sequence += 1;
        self.transition(ViewState::Loading {
            ticket,
            submission: submission.clone(),
        });
        Some((ticket, submission))
    }

    pub fn succeed(&mut self, ticket: SubmissionTicket, result: InterpretationResult) -> bool {
        if !self.accept_completion(ticket) {
            return false;
        }
        self.transition(ViewState::Results { result });
        true
    }

    /// Returns to `Input`, restoring the submitted text so it can be retried.
    pub fn fail(&mut self, ticket: SubmissionTicket) -> bool {
        if !self.accept_completion(ticket) {
            return false;
        }
        let text = match &self.state {
            ViewState::Loading { submission, .. } => submission.text().to_string(),
            _ => String::new(),
        };
        self.transition(ViewState::Input { text });
        true
    }

    /// Clears text and result from any phase. A submission still loading is
    /// superseded and its completion will be dropped.
    pub fn reset(&mut self) {
        if let Some(ticket) = self.in_flight() {
            debug!(ticket = ticket.0, "superseding in-flight submission");
        }
        self.transition(ViewState::Input {
            text: String::new(),
        });
    }

    fn accept_completion(&self, ticket: SubmissionTicket) -> bool {
        if self.is_current(ticket) {
            return true;
        }
        debug!(
            ticket = ticket.0,
            current = ?self.in_flight(),
            "dropping stale completion"
        );
        let _ = self.events.send(FlowEvent::StaleCompletionDropped { ticket });
        false
    }

    fn transition(&mut self, next: ViewState) {
        let ticket = match &next {
            ViewState::Loading { ticket, .. } => Some(*ticket),
            _ => None,
        };
        let phase = next.phase();
        self.state = next;
        let _ = self.events.send(FlowEvent::PhaseChanged { phase, ticket });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
