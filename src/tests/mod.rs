//! Crate-level test suites.
//!
//! - `mocks`: hand-written provider and sink doubles
//! - `property`: proptest invariants for filtering and playback
//! - `unit`: save client, save service and panel runtime tests

pub mod mocks;
mod property;
mod unit;
