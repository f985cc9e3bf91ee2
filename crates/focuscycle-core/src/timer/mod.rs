mod countdown;
mod poller;
mod session;

pub use countdown::{
    derive_progress, elapsed_seconds, CountdownEngine, CountdownFrame, EngineState, Progress,
};
pub use poller::{
    Poller, PollerConfig, PollerExit, PollerHandle, Presenter, DEFAULT_IDLE_TITLE, MIN_POLL_INTERVAL,
};
pub use session::{lock_session, SharedSession, TimerSession};
