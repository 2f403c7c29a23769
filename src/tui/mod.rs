//! Terminal UI components and rendering.
//!
//! This module provides the terminal user interface of sift: the application
//! state, event handling, the widgets and the terminal handle.

pub use app::App;
pub use event::Event;
pub use widget::FilterWidget;
mod app;
mod backend;
pub use backend::Tui;
/// Event handling and action definitions
pub mod event;
/// Header display
pub mod header;
pub mod help;
/// Query entry field
pub mod input;
/// Item list display and navigation
pub mod item_list;
/// TUI-specific options
pub mod options;
/// Widget trait
pub mod widget;
