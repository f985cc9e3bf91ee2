//! Periodic driver for a [`TimerSession`](super::TimerSession).
//!
//! The poller is a tokio task that ticks the session on a fixed interval and
//! hands each frame to a [`Presenter`]. It stops when the cycle finishes, when
//! it is interrupted through the handle, on `shutdown()`, and when the
//! [`PollerHandle`] is dropped (the task is aborted). There is no path on
//! which a poller outlives its cycle.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::countdown::{CountdownFrame, EngineState};
use super::session::{lock_session, SharedSession};
use crate::clock::Clock;
use crate::events::Event;

/// Title shown while no cycle is running.
pub const DEFAULT_IDLE_TITLE: &str = "Ignite Timer";

/// Shortest cadence the poller will run at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Receives what the engine exposes on every tick.
pub trait Presenter: Send + 'static {
    /// Called once per tick, and once more with the idle title when the
    /// poller stops.
    fn present(&mut self, frame: &CountdownFrame, title: &str);

    /// Called for every event produced while polling.
    fn on_event(&mut self, _event: &Event) {}
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    pub idle_title: String,
}

impl PollerConfig {
    /// Effective tick period; intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn period(&self) -> Duration {
        self.interval.max(MIN_POLL_INTERVAL)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            idle_title: DEFAULT_IDLE_TITLE.to_string(),
        }
    }
}

/// Why a poller stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerExit {
    Finished,
    Interrupted,
    /// Shut down or torn down while the cycle was still running.
    Cancelled,
}

impl PollerExit {
    fn from_state(state: EngineState) -> Self {
        match state {
            EngineState::Finished => PollerExit::Finished,
            EngineState::Interrupted => PollerExit::Interrupted,
            EngineState::Idle | EngineState::Running => PollerExit::Cancelled,
        }
    }
}

pub struct Poller;

impl Poller {
    /// Spawn the polling task on the current tokio runtime.
    pub fn spawn<C, P>(session: SharedSession<C>, config: PollerConfig, presenter: P) -> PollerHandle<C>
    where
        C: Clock + 'static,
        P: Presenter,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(poll(session.clone(), config, presenter, shutdown_rx));
        PollerHandle {
            session,
            shutdown_tx,
            task: Some(task),
            exit: None,
        }
    }
}

async fn poll<C, P>(
    session: SharedSession<C>,
    config: PollerConfig,
    mut presenter: P,
    mut shutdown_rx: watch::Receiver<bool>,
) -> PollerExit
where
    C: Clock,
    P: Presenter,
{
    let period = config.period();
    if period != config.interval {
        warn!(
            requested_ms = config.interval.as_millis() as u64,
            period_ms = period.as_millis() as u64,
            "poll interval too short, clamped"
        );
    }
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    debug!(interval_ms = period.as_millis() as u64, "poller started");

    let exit = loop {
        tokio::select! {
            _ = interval.tick() => {
                let (event, frame, state) = {
                    let mut session = lock_session(&session);
                    let event = session.tick();
                    (event, session.frame(), session.engine().state())
                };
                if let Some(event) = &event {
                    presenter.on_event(event);
                }
                presenter.present(&frame, &frame.title(&config.idle_title));
                if state != EngineState::Running {
                    break PollerExit::from_state(state);
                }
            }
            _ = shutdown_rx.changed() => {
                let (frame, state) = {
                    let session = lock_session(&session);
                    (session.frame(), session.engine().state())
                };
                presenter.present(&frame, &config.idle_title);
                break PollerExit::from_state(state);
            }
        }
    };

    debug!(?exit, "poller stopped");
    exit
}

/// Owner of a running poller. Dropping it aborts the task.
pub struct PollerHandle<C> {
    session: SharedSession<C>,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<PollerExit>>,
    exit: Option<PollerExit>,
}

impl<C: Clock> PollerHandle<C> {
    pub fn session(&self) -> &SharedSession<C> {
        &self.session
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the poller to stop on its own (cycle finished or interrupted).
    ///
    /// Cancel-safe: dropping the returned future leaves the poller running.
    pub async fn wait(&mut self) -> PollerExit {
        if let Some(exit) = self.exit {
            return exit;
        }
        let exit = match self.task.as_mut() {
            Some(task) => task.await.unwrap_or(PollerExit::Cancelled),
            None => PollerExit::Cancelled,
        };
        self.task = None;
        self.exit = Some(exit);
        exit
    }

    /// Stop polling without touching the cycle.
    pub async fn shutdown(&mut self) -> PollerExit {
        // Err only means the task already exited.
        let _ = self.shutdown_tx.send(true);
        self.wait().await
    }

    /// Interrupt the running cycle and stop polling.
    ///
    /// Returns the interrupt event, or `None` if the cycle had already
    /// reached a terminal state.
    pub async fn interrupt(&mut self) -> Option<Event> {
        let event = lock_session(&self.session).interrupt();
        self.shutdown().await;
        event
    }
}

impl<C> Drop for PollerHandle<C> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
