//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! Rendering reads [`crate::app::state::PickerState`] only; no file I/O
//! happens here.

pub mod layout;
pub mod picker;
pub mod theme;
