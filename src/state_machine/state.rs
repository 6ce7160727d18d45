//! Chat screen state

use serde::{Deserialize, Serialize};

/// Which screen a chat is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScreenState {
    /// Nothing shown yet in this process
    #[default]
    Idle,
    MainMenu,
    MovePicker,
    /// A move was chosen and the round is being played
    Result,
}
