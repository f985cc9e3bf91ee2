//! # focuscycle Core Library
//!
//! This library provides the core logic for focuscycle, a single-task
//! countdown tracker. All operations are available to the standalone CLI
//! binary; any other front end is a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Clock**: wall-clock source; elapsed time is always `now - start`
//! - **Cycle Store**: append-only cycle log plus the active-cycle pointer
//! - **Countdown Engine**: tick-driven state machine that finishes cycles
//! - **Poller**: cancellable tokio task that ticks the engine on a cadence
//! - **History**: read-only projection of the log into display rows
//!
//! ## Key Components
//!
//! - [`TimerSession`]: owning container for store + engine
//! - [`CycleStore`]: cycle log and transitions
//! - [`CountdownEngine`]: elapsed/remaining derivation
//! - [`Poller`]: periodic driver with guaranteed cleanup
//! - [`Config`]: application configuration management

pub mod clock;
pub mod cycle;
pub mod error;
pub mod events;
pub mod format;
pub mod history;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cycle::{Cycle, CycleId, CycleStatus, CycleStore, NewCycle};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use format::format_countdown;
pub use history::{HistoryRow, StatusLabel};
pub use storage::Config;
pub use timer::{
    CountdownEngine, CountdownFrame, EngineState, Poller, PollerConfig, PollerExit, PollerHandle,
    Presenter, SharedSession, TimerSession,
};
