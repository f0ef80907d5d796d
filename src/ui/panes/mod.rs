//! TUI pane rendering modules
//!
//! - [`source`]: the function file with syntax highlighting and the error line
//! - [`functions`]: every parsed function, written back in normalized form
//! - [`status`]: status bar with keybindings and parse state
//!
//! Each pane module exports a `render_*` function that draws into the given
//! area and updates only the scroll offset it is handed.

pub mod functions;
pub mod source;
pub mod status;

pub use functions::render_functions_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;
