//! Rendering adapter: renderer-agnostic scene composition and presentation.
//!
//! # Invariants
//! - Rendering never mutates game state.
//! - Draw order is fixed: board, robots (each followed by its cargo), then
//!   unclaimed station cargo.
//!
//! Model import, shaders, and windowing live behind the `Presenter` trait;
//! this crate ships a text presenter and a recorder for headless runs.

mod present;
mod renderer;
mod scene;
mod sketch;

pub use present::{FrameRecorder, Presenter, TextPresenter, present_game};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{AssetRef, DrawItem, DrawKind, MODEL_SCALE, compose};
pub use sketch::BoardSketch;
