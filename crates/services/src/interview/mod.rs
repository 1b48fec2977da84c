//! The wizard's session state machine and the transitions that call out to
//! question and feedback generation.

mod intent;
mod session;
mod snapshot;
mod workflow;

pub use intent::WizardIntent;
pub use session::{InterviewSession, ReviewDirection, SessionPhase, check_committed_answer};
pub use snapshot::SessionSnapshot;
pub use workflow::{FeedbackStatus, InterviewLoopService, StartRequest};
