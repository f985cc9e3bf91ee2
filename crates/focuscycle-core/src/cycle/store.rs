//! Append-only cycle log with a single active-cycle pointer.
//!
//! The store is the only place cycle state changes. Terminal transitions are
//! idempotent: a second finish or interrupt on the same cycle returns `None`
//! and leaves the first outcome in place.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::model::{Cycle, CycleId, CycleStatus, NewCycle};
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::timer::elapsed_seconds;

#[derive(Debug)]
pub struct CycleStore<C> {
    clock: C,
    cycles: Vec<Cycle>,
    active: Option<CycleId>,
}

impl<C: Clock> CycleStore<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            cycles: Vec::new(),
            active: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Full log, oldest first.
    pub fn list_cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn active_cycle(&self) -> Option<&Cycle> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: CycleId) -> Option<&Cycle> {
        self.cycles.iter().find(|c| c.id() == id)
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Validate and append a new running cycle.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty task or minutes outside
    /// [1, 60], and `CycleAlreadyActive` while another cycle is running.
    /// The log is untouched in every error case.
    pub fn create_cycle(&mut self, task: &str, minutes_amount: i64) -> Result<Cycle> {
        let intake = NewCycle::new(task, minutes_amount)?;
        self.create(intake)
    }

    /// Append a cycle from already-validated intake.
    pub fn create(&mut self, intake: NewCycle) -> Result<Cycle> {
        if let Some(active) = self.active_cycle() {
            warn!(cycle_id = %active.id(), "rejected new cycle while one is running");
            return Err(CoreError::CycleAlreadyActive {
                cycle_id: active.id(),
            });
        }

        let cycle = Cycle::start(intake, self.clock.now());
        info!(
            cycle_id = %cycle.id(),
            task = cycle.task(),
            minutes = cycle.minutes_amount(),
            "cycle created"
        );
        self.active = Some(cycle.id());
        self.cycles.push(cycle.clone());
        Ok(cycle)
    }

    /// Finish the cycle if it is still running. `None` means no-op.
    pub fn mark_finished(&mut self, id: CycleId) -> Option<Event> {
        let cycle = self.terminate(id, |at| CycleStatus::Finished { at })?;
        let at = cycle.finished_date()?;
        info!(cycle_id = %id, task = cycle.task(), "cycle finished");
        Some(Event::CycleFinished {
            cycle_id: id,
            task: cycle.task().to_string(),
            at,
        })
    }

    /// Interrupt the cycle if it is still running. `None` means no-op.
    pub fn mark_interrupted(&mut self, id: CycleId) -> Option<Event> {
        let cycle = self.terminate(id, |at| CycleStatus::Interrupted { at })?;
        let at = cycle.interrupted_date()?;
        let elapsed_secs = elapsed_seconds(cycle.start_date(), at);
        info!(cycle_id = %id, task = cycle.task(), elapsed_secs, "cycle interrupted");
        Some(Event::CycleInterrupted {
            cycle_id: id,
            task: cycle.task().to_string(),
            elapsed_secs,
            at,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn terminate(
        &mut self,
        id: CycleId,
        status_at: impl FnOnce(DateTime<Utc>) -> CycleStatus,
    ) -> Option<&Cycle> {
        let now = self.clock.now();
        let cycle = self.cycles.iter_mut().find(|c| c.id() == id)?;

        // A clock that stepped backwards must not put the end before the start.
        let at = if now < cycle.start_date() {
            warn!(cycle_id = %id, %now, start = %cycle.start_date(), "clock moved backwards");
            cycle.start_date()
        } else {
            now
        };

        if !cycle.terminate(status_at(at)) {
            return None;
        }
        if self.active == Some(id) {
            self.active = None;
        }
        Some(&*cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::ValidationError;
    use chrono::{Duration, TimeZone};

    fn store() -> (CycleStore<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        (CycleStore::new(clock.clone()), clock)
    }

    #[test]
    fn create_appends_active_cycle() {
        let (mut store, clock) = store();
        let cycle = store.create_cycle("Write spec", 1).unwrap();

        assert_eq!(cycle.start_date(), clock.now());
        assert_eq!(cycle.finished_date(), None);
        assert_eq!(cycle.interrupted_date(), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.active_cycle().map(Cycle::id), Some(cycle.id()));
    }

    #[test]
    fn create_rejects_invalid_intake_without_mutation() {
        let (mut store, _) = store();
        let err = store.create_cycle("", 25).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyTask)));
        let err = store.create_cycle("Draft", 0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MinutesOutOfRange { .. })
        ));
        assert!(store.is_empty());
        assert!(store.active_cycle().is_none());
    }

    #[test]
    fn create_rejects_while_cycle_running() {
        let (mut store, _) = store();
        let first = store.create_cycle("Draft", 25).unwrap();
        let err = store.create_cycle("Another", 5).unwrap_err();
        match err {
            CoreError::CycleAlreadyActive { cycle_id } => assert_eq!(cycle_id, first.id()),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn finish_clears_active_and_allows_next_cycle() {
        let (mut store, clock) = store();
        let first = store.create_cycle("Draft", 1).unwrap();
        clock.advance(Duration::seconds(60));

        let event = store.mark_finished(first.id()).unwrap();
        assert!(matches!(event, Event::CycleFinished { .. }));
        assert!(store.active_cycle().is_none());
        assert_eq!(
            store.get(first.id()).unwrap().finished_date(),
            Some(clock.now())
        );

        let second = store.create_cycle("Review", 5).unwrap();
        let ids: Vec<_> = store.list_cycles().iter().map(Cycle::id).collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }

    #[test]
    fn terminal_marks_are_idempotent() {
        let (mut store, clock) = store();
        let cycle = store.create_cycle("Draft", 25).unwrap();
        clock.advance(Duration::seconds(10));

        let event = store.mark_interrupted(cycle.id()).unwrap();
        match event {
            Event::CycleInterrupted { elapsed_secs, .. } => assert_eq!(elapsed_secs, 10),
            other => panic!("unexpected event: {other:?}"),
        }
        let interrupted_at = store.get(cycle.id()).unwrap().interrupted_date();

        clock.advance(Duration::seconds(5));
        assert!(store.mark_interrupted(cycle.id()).is_none());
        assert!(store.mark_finished(cycle.id()).is_none());

        let stored = store.get(cycle.id()).unwrap();
        assert_eq!(stored.interrupted_date(), interrupted_at);
        assert_eq!(stored.finished_date(), None);
    }

    #[test]
    fn unknown_cycle_is_noop() {
        let (mut store, _) = store();
        assert!(store.mark_finished(CycleId::new()).is_none());
        assert!(store.mark_interrupted(CycleId::new()).is_none());
    }

    #[test]
    fn backwards_clock_clamps_terminal_date_to_start() {
        let (mut store, clock) = store();
        let cycle = store.create_cycle("Draft", 25).unwrap();
        clock.advance(Duration::seconds(-120));

        store.mark_interrupted(cycle.id()).unwrap();
        let stored = store.get(cycle.id()).unwrap();
        assert_eq!(stored.interrupted_date(), Some(cycle.start_date()));
    }
}
