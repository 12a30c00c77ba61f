use std::fmt;

use shoji_ipc::Rect;

use super::DisplayId;
use crate::platform::DisplayInfo;

#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    pub id: DisplayId,
    /// Monitor area minus taskbar and docked toolbars.
    pub work_area: Rect,
    pub is_primary: bool,
}

impl Display {
    pub fn new(id: DisplayId, work_area: Rect, is_primary: bool) -> Self {
        Self {
            id,
            work_area,
            is_primary,
        }
    }
}

impl From<DisplayInfo> for Display {
    fn from(info: DisplayInfo) -> Self {
        Self::new(info.id, info.work_area, info.is_primary)
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.work_area)?;
        if self.is_primary {
            write!(f, " PRIMARY")?;
        }
        Ok(())
    }
}
