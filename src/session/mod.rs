pub mod matcher;
pub mod orchestrator;
pub mod queue;

pub use matcher::{MatchEngine, MatchOutcome, MatchState};
pub use orchestrator::{EndReason, SessionEvent, SessionOrchestrator, SessionState};
