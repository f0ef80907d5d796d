//! # Introduction
//!
//! ggadam pairs two pieces of a retained-mode GUI toolkit: the timer
//! service that drives periodic window notifications from the event loop,
//! and the front end of the Adam function language used for property
//! bindings.
//!
//! ## Timers
//!
//! A [`gui::Gui`] owns a tick clock and a registry of [`gui::Timer`]s. Each
//! loop iteration calls [`gui::Gui::process_timers`], which sends
//! [`gui::WndEvent::TimerFiring`] to every window subscribed to a due timer.
//!
//! ## Function pipeline
//!
//! ```text
//! Source → Lexer → Parser → AdamFunctions → Writer → Source
//! ```
//!
//! 1. [`parser`] tokenises function files and builds one [`parser::AdamFunction`]
//!    per definition.
//! 2. [`writer`] serializes functions back to normalized source; parsing the
//!    output gives back the same AST.
//! 3. [`harness`] runs both over a file and reports pass/fail.
//! 4. [`ui`] is a ratatui viewer showing a file next to its written form;
//!    not part of the stable library API.

pub mod gui;
pub mod harness;
pub mod parser;
pub mod ui;
pub mod writer;
