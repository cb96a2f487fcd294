//! Client core for the dream journal: the interpretation submission flow,
//! the authenticated dream service client and the history/detail loaders.

pub mod api;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod flow;
pub mod history;
pub mod mapper;
pub mod notify;
pub mod signup;

pub use api::{DreamApi, HttpDreamApi};
pub use controller::{FlowController, FlowEvent, SubmissionTicket, ViewPhase, ViewState};
pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use error::FlowError;
pub use flow::{DreamInterpretationFlow, FlowSettings, SubmitOutcome};
pub use history::{filter_dreams, load_dream_detail, load_history, DreamDetail, EmotionFilter};
pub use notify::{Notifier, RecordingNotifier};
pub use signup::{SignUpError, SignUpForm};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
