//! The quiz session core: clock, persistence, answer cache, countdown
//! timer, and the lifecycle state machine.

mod cache;
mod clock;
mod controller;
mod store;
mod timer;

pub use cache::{AnswerCache, ANSWER_CACHE_TTL_MILLIS};
pub use clock::{Clock, SystemClock};
pub use controller::{Advance, InitError, SessionController, SessionError, Step};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
pub use timer::{remaining_millis, CountdownTimer, TimerEvent};

#[cfg(test)]
pub use clock::ManualClock;
