//! Terminal UI for pickem.
//!
//! [`TerminalHost`] implements the engine's `Host` trait: mounting builds
//! the component tree (`Provider` > `Baseline`, `ThemedApp`) against a
//! store and draws it. [`InputPump`] reads crossterm events off the async
//! runtime and [`handle_events`] turns them into dispatches.

mod components;
mod host;
mod input;
mod theme;

#[cfg(test)]
mod test_support;

pub use components::{Baseline, Component, Provider, RenderContext, ThemedApp, app_tree};
pub use host::{Document, TerminalHost};
pub use input::{
    Command, InputOutcome, InputPump, apply_event, command_for, handle_events, run_command,
};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};
