//! Step playback over a timeline of array snapshots.
//!
//! The controller is a plain state machine plus one optional timer. It is
//! owned by the orchestrator task and never shared across threads.

mod controller;
mod speed;

pub(crate) use controller::PlaybackController;
pub(crate) use speed::Speed;
