//! Core engine — the probe → select → decide → reallocate loop.

pub mod controller;
pub mod executor;
pub mod gate;
pub mod selection;

pub use controller::{Controller, ControllerSettings};
