//! Application orchestration — commands, picker state, event loop input.

pub mod commands;
pub mod event;
pub mod handler;
pub mod state;
