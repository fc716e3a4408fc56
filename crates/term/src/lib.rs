//! Terminal presenter.
//!
//! A small, game-oriented rendering layer: [`GameView`] draws a
//! [`core::GameSnapshot`] into a [`FrameBuffer`] with no I/O, and
//! [`TerminalRenderer`] flushes framebuffers to the terminal as diffs.
//!
//! Board cells are drawn 2 columns wide to compensate for the usual terminal
//! glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb, Weight};
pub use game_view::{GameView, Viewport};
pub use renderer::TerminalRenderer;
