// Library target for integration tests. The binary entry point is main.rs;
// this file re-declares the module tree so tests can reach the domain types
// via `strokr::session::*`, `strokr::store::*` and friends.
#![allow(dead_code)]

pub mod config;
pub mod input;
pub mod pattern;
pub mod report;
pub mod session;
pub mod stats;
pub mod store;

// Private: only the binary drives the terminal.
mod app;
mod event;
mod logging;
mod ui;
