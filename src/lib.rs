//! ROTOR — Autonomous yield-rotation controller.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod registry;
pub mod probe;
pub mod engine;
pub mod wallet;
