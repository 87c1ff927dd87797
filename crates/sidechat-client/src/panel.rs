//! Chat panel visibility state machine.
//!
//! Two states toggled by a single external trigger (the chat button in the
//! host player's control bar). Showing also scrolls the transcript to its
//! latest content and focuses the input; hiding only hides. Visibility is
//! independent of the sync loop — polling continues while hidden.

/// UI surface the toggle drives. Implemented by the widget layer.
pub trait ChatPanel: Send + Sync {
    fn set_visible(&self, visible: bool);
    fn scroll_to_latest(&self);
    fn focus_input(&self);
}

/// Panel visibility. Sessions start hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Hidden,
    Visible,
}

/// Two-state toggle machine.
#[derive(Debug, Default)]
pub struct PanelToggle {
    state: PanelState,
}

impl PanelToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Flip the state, applying the transition's side effects to `panel`.
    pub fn toggle(&mut self, panel: &dyn ChatPanel) -> PanelState {
        self.state = match self.state {
            PanelState::Hidden => {
                panel.set_visible(true);
                panel.scroll_to_latest();
                panel.focus_input();
                PanelState::Visible
            }
            PanelState::Visible => {
                panel.set_visible(false);
                PanelState::Hidden
            }
        };
        self.state
    }
}
