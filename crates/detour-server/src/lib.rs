//! Shared library surface for the detour server and its tests.

pub mod api;
pub mod config;
pub mod state;
