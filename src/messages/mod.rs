//! Message types for inter-layer communication.
//!
//! UI events flow from the terminal loop to the App actor; render updates
//! flow back from the App actor and the view controller.

pub mod ui_events;
pub mod render;

pub use ui_events::UiEvent;
pub use render::{RenderState, RenderUpdate};
