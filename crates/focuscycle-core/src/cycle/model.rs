use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Shortest accepted cycle, in minutes.
pub const MIN_MINUTES: u32 = 1;
/// Longest accepted cycle, in minutes.
pub const MAX_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(Uuid);

impl CycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a cycle.
///
/// A cycle carries at most one terminal timestamp; the enum makes
/// "finished and interrupted" unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CycleStatus {
    Running,
    Finished { at: DateTime<Utc> },
    Interrupted { at: DateTime<Utc> },
}

impl CycleStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CycleStatus::Running)
    }
}

/// Validated intake: a task name and a cycle length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCycle {
    task: String,
    minutes_amount: u32,
}

impl NewCycle {
    /// Validate raw intake values.
    ///
    /// `minutes` is taken as `i64` so out-of-range input coming from a form
    /// (negative, zero, huge) is reported rather than wrapped.
    pub fn new(task: &str, minutes: i64) -> Result<Self, ValidationError> {
        let task = task.trim();
        if task.is_empty() {
            return Err(ValidationError::EmptyTask);
        }
        let in_range = (i64::from(MIN_MINUTES)..=i64::from(MAX_MINUTES)).contains(&minutes);
        if !in_range {
            return Err(ValidationError::MinutesOutOfRange {
                value: minutes,
                min: MIN_MINUTES,
                max: MAX_MINUTES,
            });
        }
        Ok(Self {
            task: task.to_string(),
            minutes_amount: minutes as u32,
        })
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn minutes_amount(&self) -> u32 {
        self.minutes_amount
    }
}

/// One countdown attempt.
///
/// Fields are private: the task, length and start date never change after
/// creation, and only the store moves the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    id: CycleId,
    task: String,
    minutes_amount: u32,
    start_date: DateTime<Utc>,
    status: CycleStatus,
}

impl Cycle {
    pub(crate) fn start(intake: NewCycle, start_date: DateTime<Utc>) -> Self {
        Self {
            id: CycleId::new(),
            task: intake.task,
            minutes_amount: intake.minutes_amount,
            start_date,
            status: CycleStatus::Running,
        }
    }

    pub fn id(&self) -> CycleId {
        self.id
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn minutes_amount(&self) -> u32 {
        self.minutes_amount
    }

    /// Total duration in seconds.
    pub fn total_secs(&self) -> u64 {
        u64::from(self.minutes_amount) * 60
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn status(&self) -> CycleStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == CycleStatus::Running
    }

    pub fn finished_date(&self) -> Option<DateTime<Utc>> {
        match self.status {
            CycleStatus::Finished { at } => Some(at),
            _ => None,
        }
    }

    pub fn interrupted_date(&self) -> Option<DateTime<Utc>> {
        match self.status {
            CycleStatus::Interrupted { at } => Some(at),
            _ => None,
        }
    }

    /// Move a running cycle to `status`. Returns false if already terminal.
    pub(crate) fn terminate(&mut self, status: CycleStatus) -> bool {
        if self.status.is_terminal() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }
}
