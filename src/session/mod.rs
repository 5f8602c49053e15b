//! Per-call session: lifecycle phases, remote candidate buffering and the
//! controller that drives a [`Transport`](crate::transport::Transport).

pub mod candidate_buffer;
pub mod session_action;
pub mod session_config;
pub mod session_controller;
pub mod session_error;
pub mod session_event;
pub mod session_phase;
pub mod session_report;
pub mod session_state;
pub mod transition;

pub use candidate_buffer::CandidateBuffer;
pub use session_action::SessionAction;
pub use session_config::SessionConfig;
pub use session_controller::SessionController;
pub use session_error::SessionError;
pub use session_event::SessionEvent;
pub use session_phase::SessionPhase;
pub use session_report::SessionReport;
pub use session_state::SessionState;
pub use transition::transition;
