//! Application-level orchestration utilities.
//!
//! This module owns the session lifecycle (requests, playback commands, timer ticks) and
//! post-fetch processing such as building the run record and exports. UI/CLI layers call
//! into this module to keep responsibilities separated.

mod controller;
mod post_process;

pub(crate) use controller::{run_controller, UiCommand};
pub(crate) use post_process::process_fetch_completion;
