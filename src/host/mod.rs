//! Host environment adapters – the setting store the tracker watches.

pub mod settings;
