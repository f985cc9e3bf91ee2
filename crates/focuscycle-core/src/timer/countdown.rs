//! Countdown engine.
//!
//! Like the rest of the timer layer this is a wall-clock-based state machine
//! with no internal thread: something (usually [`super::Poller`]) calls
//! `tick()` periodically, and every tick recomputes elapsed time from the
//! cycle's start date. Late or missed ticks therefore never skew the result.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Finished | Interrupted)
//! ```
//!
//! `Finished` is reached only from `tick()`; `Interrupted` only from
//! `interrupt()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::cycle::{CycleId, CycleStatus, CycleStore};
use crate::events::Event;
use crate::format::{format_countdown, split_countdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Idle,
    Running,
    Finished,
    Interrupted,
}

/// Whole seconds from `start` to `now`, truncated, never negative.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - start).num_seconds()).unwrap_or(0)
}

/// Elapsed/remaining split for one observation of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Clamped to `[0, total]`.
    pub elapsed_secs: u64,
    pub remaining_secs: u64,
    pub is_complete: bool,
}

/// Derive progress from absolute timestamps.
pub fn derive_progress(start: DateTime<Utc>, now: DateTime<Utc>, total_secs: u64) -> Progress {
    let elapsed = elapsed_seconds(start, now);
    if elapsed >= total_secs {
        Progress {
            elapsed_secs: total_secs,
            remaining_secs: 0,
            is_complete: true,
        }
    } else {
        Progress {
            elapsed_secs: elapsed,
            remaining_secs: total_secs - elapsed,
            is_complete: false,
        }
    }
}

/// What the presentation layer renders on each tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownFrame {
    pub minutes: String,
    pub seconds: String,
    pub is_running: bool,
    pub remaining_secs: u64,
    pub total_secs: u64,
}

impl CountdownFrame {
    fn new(remaining_secs: u64, total_secs: u64, is_running: bool) -> Self {
        let parts = split_countdown(remaining_secs);
        Self {
            minutes: parts.minutes,
            seconds: parts.seconds,
            is_running,
            remaining_secs,
            total_secs,
        }
    }

    /// `MM:SS`.
    pub fn display(&self) -> String {
        format!("{}:{}", self.minutes, self.seconds)
    }

    /// Title surface text: the countdown while running, `idle_label` otherwise.
    pub fn title(&self, idle_label: &str) -> String {
        if self.is_running {
            self.display()
        } else {
            idle_label.to_string()
        }
    }
}

/// Drives the active cycle of a [`CycleStore`] to completion.
///
/// Holds no cycle data of its own beyond the id it is following; every
/// mutation goes through the store.
#[derive(Debug, Clone)]
pub struct CountdownEngine {
    state: EngineState,
    cycle_id: Option<CycleId>,
    total_secs: u64,
    amount_seconds_passed: u64,
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self {
            state: EngineState::Idle,
            cycle_id: None,
            total_secs: 0,
            amount_seconds_passed: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn cycle_id(&self) -> Option<CycleId> {
        self.cycle_id
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn amount_seconds_passed(&self) -> u64 {
        self.amount_seconds_passed
    }

    pub fn remaining_secs(&self) -> u64 {
        match self.state {
            EngineState::Running | EngineState::Finished => {
                self.total_secs.saturating_sub(self.amount_seconds_passed)
            }
            EngineState::Idle | EngineState::Interrupted => 0,
        }
    }

    pub fn frame(&self) -> CountdownFrame {
        CountdownFrame::new(self.remaining_secs(), self.total_secs, self.is_running())
    }

    /// Build a full state snapshot event.
    pub fn snapshot<C: Clock>(&self, store: &CycleStore<C>) -> Event {
        let task = self
            .cycle_id
            .and_then(|id| store.get(id))
            .map(|c| c.task().to_string());
        Event::StateSnapshot {
            state: self.state,
            cycle_id: self.cycle_id,
            task,
            remaining_secs: self.remaining_secs(),
            total_secs: self.total_secs,
            display: format_countdown(self.remaining_secs()),
            at: store.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Pick up a newly active cycle from the store (`Idle -> Running`).
    pub fn sync<C: Clock>(&mut self, store: &CycleStore<C>) -> Option<Event> {
        let active = store.active_cycle()?;
        if self.is_running() && self.cycle_id == Some(active.id()) {
            return None;
        }
        self.state = EngineState::Running;
        self.cycle_id = Some(active.id());
        self.total_secs = active.total_secs();
        self.amount_seconds_passed = 0;
        debug!(cycle_id = %active.id(), total_secs = self.total_secs, "countdown started");
        Some(Event::CountdownStarted {
            cycle_id: active.id(),
            total_secs: self.total_secs,
            at: store.now(),
        })
    }

    /// Call periodically. Returns `Some(Event::CycleFinished)` when the cycle completes.
    pub fn tick<C: Clock>(&mut self, store: &mut CycleStore<C>) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        let id = self.cycle_id?;
        let cycle = match store.get(id) {
            Some(cycle) => cycle,
            None => {
                self.reset();
                return None;
            }
        };
        if cycle.status().is_terminal() {
            // Terminated through the store directly; follow it.
            self.adopt(cycle.status());
            return None;
        }

        let now = store.now();
        let start = cycle.start_date();
        if now < start {
            warn!(cycle_id = %id, %now, %start, "clock is behind cycle start");
        }
        let progress = derive_progress(start, now, self.total_secs);
        self.amount_seconds_passed = progress.elapsed_secs;
        debug!(cycle_id = %id, remaining_secs = progress.remaining_secs, "tick");

        if !progress.is_complete {
            return None;
        }
        let event = store.mark_finished(id);
        match store.get(id).map(|c| c.status()) {
            Some(status) => self.adopt(status),
            None => self.reset(),
        }
        event
    }

    /// Explicit user interrupt (`Running -> Interrupted`).
    ///
    /// A no-op when nothing is running. If the store already holds a
    /// terminal state for the cycle, the engine adopts it instead.
    pub fn interrupt<C: Clock>(&mut self, store: &mut CycleStore<C>) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        let id = self.cycle_id?;
        let event = store.mark_interrupted(id);
        match store.get(id).map(|c| c.status()) {
            Some(status) => self.adopt(status),
            None => self.reset(),
        }
        event
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn adopt(&mut self, status: CycleStatus) {
        match status {
            CycleStatus::Running => self.state = EngineState::Running,
            CycleStatus::Finished { .. } => {
                self.amount_seconds_passed = self.total_secs;
                self.state = EngineState::Finished;
            }
            CycleStatus::Interrupted { .. } => self.state = EngineState::Interrupted,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
