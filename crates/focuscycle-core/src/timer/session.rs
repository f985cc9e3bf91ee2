//! The owning container for cycle state.
//!
//! Intake, the poller and the history view all go through a
//! [`TimerSession`]; none of them keeps its own copy of the active cycle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::countdown::{CountdownEngine, CountdownFrame};
use crate::clock::Clock;
use crate::cycle::{Cycle, CycleStore, NewCycle};
use crate::error::Result;
use crate::events::Event;
use crate::history::{self, HistoryRow};

/// Session shared between the poller task and command handlers.
pub type SharedSession<C> = Arc<Mutex<TimerSession<C>>>;

#[derive(Debug)]
pub struct TimerSession<C> {
    store: CycleStore<C>,
    engine: CountdownEngine,
}

impl<C: Clock> TimerSession<C> {
    pub fn new(clock: C) -> Self {
        Self {
            store: CycleStore::new(clock),
            engine: CountdownEngine::new(),
        }
    }

    /// Wrap into the shared form used by [`super::Poller`].
    pub fn shared(self) -> SharedSession<C> {
        Arc::new(Mutex::new(self))
    }

    pub fn store(&self) -> &CycleStore<C> {
        &self.store
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    /// Create a cycle and hand it to the engine.
    ///
    /// Returns the creation and countdown-start events, in that order.
    ///
    /// # Errors
    ///
    /// Fails on invalid intake or while another cycle is running.
    pub fn start(&mut self, task: &str, minutes_amount: i64) -> Result<Vec<Event>> {
        let intake = NewCycle::new(task, minutes_amount)?;
        self.start_validated(intake)
    }

    pub fn start_validated(&mut self, intake: NewCycle) -> Result<Vec<Event>> {
        let cycle = self.store.create(intake)?;
        let mut events = vec![Event::CycleCreated {
            cycle_id: cycle.id(),
            task: cycle.task().to_string(),
            minutes_amount: cycle.minutes_amount(),
            at: cycle.start_date(),
        }];
        events.extend(self.engine.sync(&self.store));
        Ok(events)
    }

    pub fn tick(&mut self) -> Option<Event> {
        self.engine.tick(&mut self.store)
    }

    pub fn interrupt(&mut self) -> Option<Event> {
        self.engine.interrupt(&mut self.store)
    }

    pub fn active_cycle(&self) -> Option<&Cycle> {
        self.store.active_cycle()
    }

    pub fn frame(&self) -> CountdownFrame {
        self.engine.frame()
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(&self.store)
    }

    /// History rows as of the session clock's current time.
    pub fn history(&self) -> Vec<HistoryRow> {
        history::project(self.store.list_cycles(), self.store.now())
    }
}

/// Lock a shared session, recovering the data from a poisoned lock.
///
/// A panicking presenter must not take the cycle log down with it.
pub fn lock_session<C>(session: &SharedSession<C>) -> MutexGuard<'_, TimerSession<C>> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
