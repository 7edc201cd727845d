//! Shared processing utilities.
//!
//! The per-switch processing pipeline (`process`) and the periodic
//! progress logger (`progress`).

mod process;
mod progress;

pub use process::{decode_switch, process_dump, ParsedSwitch, SwitchOutcome, UndecodedDescriptor};
pub use progress::{spawn_progress_logger, ProgressCounter};
