//! TUI module for the memo application.

mod app;
pub mod theme;
mod widgets;

pub use app::App;
