//! Live judge sessions over WebSocket and per-judge group broadcasting.

pub mod dispatcher;
pub mod messages;
pub mod session;
pub mod socket;

pub use dispatcher::{BroadcastDispatcher, group_name};
pub use messages::CompetitionEvent;
pub use session::SessionManager;
