use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cycle::CycleId;
use crate::timer::EngineState;

/// Every state change in the system produces an Event.
/// Presenters render them; the CLI streams them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CycleCreated {
        cycle_id: CycleId,
        task: String,
        minutes_amount: u32,
        at: DateTime<Utc>,
    },
    /// The engine picked up a newly active cycle and began counting down.
    CountdownStarted {
        cycle_id: CycleId,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    CycleFinished {
        cycle_id: CycleId,
        task: String,
        at: DateTime<Utc>,
    },
    CycleInterrupted {
        cycle_id: CycleId,
        task: String,
        /// Whole seconds between start and interruption.
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: EngineState,
        cycle_id: Option<CycleId>,
        task: Option<String>,
        remaining_secs: u64,
        total_secs: u64,
        /// `MM:SS` rendering of `remaining_secs`.
        display: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn cycle_id(&self) -> Option<CycleId> {
        match self {
            Event::CycleCreated { cycle_id, .. }
            | Event::CountdownStarted { cycle_id, .. }
            | Event::CycleFinished { cycle_id, .. }
            | Event::CycleInterrupted { cycle_id, .. } => Some(*cycle_id),
            Event::StateSnapshot { cycle_id, .. } => *cycle_id,
        }
    }
}
