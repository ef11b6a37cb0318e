//! Terminal UI for the taskline dashboard.

// === Submodules ===

pub mod action_words;
pub mod app;
pub mod input;
pub mod ui;
pub mod viewport;
pub mod widgets;

// === Re-exports ===

pub use ui::run_tui;
