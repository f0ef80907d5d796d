//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, and the
//!   reload timer that re-parses the function file when it changes on disk
//! - **[`panes`]**: render functions for each visible pane (source, written
//!   functions, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! Construct an [`App`] with a [`Gui`] and a file path, then call
//! [`App::run`] to start the event loop.
//!
//! [`Gui`]: crate::gui::Gui
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
