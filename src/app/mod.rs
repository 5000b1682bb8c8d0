//! App layer - view state, the controller that drives the gateway, and the
//! actor that feeds it UI events.

pub mod state;
pub mod controller;
pub mod actor;
pub mod commands;

pub use state::{UiState, ViewState};
pub use controller::ViewController;
pub use actor::AppActor;
