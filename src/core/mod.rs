//! Core logic – the MRU history, its on-disk store, and the tracker tying them
//! together.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod history;
pub mod store;
pub mod tracker;
