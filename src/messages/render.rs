//! Render state - what the UI needs to draw a frame

use crate::app::state::{UiState, ViewState};

/// Update published to the UI loop
#[derive(Debug, Clone)]
pub enum RenderUpdate {
    /// Controller state changed (lists, totals, loading, error)
    View(ViewState),
    /// Form, focus or popup state changed
    Ui(UiState),
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub view: ViewState,
    pub ui: UiState,
}

impl RenderState {
    pub fn apply(&mut self, update: RenderUpdate) {
        match update {
            RenderUpdate::View(view) => self.view = view,
            RenderUpdate::Ui(ui) => self.ui = ui,
        }
    }
}
