//! Integration test harness.

mod mock;
mod rotation;
