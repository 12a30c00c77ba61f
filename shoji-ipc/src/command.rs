use serde::{Deserialize, Serialize};

use crate::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // Layout operations
    Refresh,
    ToggleTopmost { window_id: isize },
    RestorePositions,

    // Queries
    ListWindows,
    GetState,

    // Control
    Quit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Error { message: String },
    Windows { windows: Vec<WindowInfo> },
    State { state: StateInfo },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: isize,
    pub title: String,
    pub class_name: String,
    pub rect: Rect,
    pub display_id: Option<isize>,
    pub is_topmost: bool,
    pub is_dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateInfo {
    pub strategy: String,
    pub display_count: usize,
    pub window_count: usize,
    pub dragging_window_id: Option<isize>,
}
