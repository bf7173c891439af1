//! Runtime module - hosting the controller outside a browser
//!
//! This module contains the pieces needed to drive the edit controller
//! end to end:
//! - `app` - replay host executing commands against a recorded surface
//! - `scheduler` - click debounce timers (virtual clock or threads)

pub mod app;
pub mod scheduler;

pub use app::{App, FocusedInput, Surface, SyncedInput, TranscriptEntry};
pub use scheduler::{ManualScheduler, Scheduler, ThreadScheduler};
