//! nav-session: the navigation guidance state machine
//!
//! Orchestrates one person's trip through a building: locate the current
//! waypoint, resolve a destination, plan a route, then announce and confirm
//! one edge at a time until arrival. The whole engine is a synchronous
//! cooperative loop; the only suspension points are the blocking calls into
//! the position sensor and the voice collaborators, and a shared
//! [`CancelToken`] tears everything down cleanly from any of them.

mod error;
pub use error::{Result, SessionError};

mod cancel;
pub use cancel::CancelToken;

mod confirm;
pub use confirm::{ConfirmOutcome, ConfirmPolicy, ConfirmationLoop, LocateOutcome};

mod types;
pub use types::{Phase, Reply, SessionAction, SessionConfig, SessionState, SessionSummary};

mod session;
pub use session::NavigationSession;
