mod model;
mod store;

pub use model::{Cycle, CycleId, CycleStatus, NewCycle, MAX_MINUTES, MIN_MINUTES};
pub use store::CycleStore;
