use shoji_ipc::Rect;

use super::{Display, DisplayId, Window};
use crate::platform::WindowSystem;

/// The connected monitors and the window→display mapping.
#[derive(Debug, Default)]
pub struct DisplayTopology {
    displays: Vec<Display>,
}

impl DisplayTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the display list with what the platform reports now.
    pub fn enumerate<W: WindowSystem>(&mut self, ws: &W) {
        self.displays = ws.enumerate_displays().into_iter().map(Display::from).collect();
        if self.displays.is_empty() {
            tracing::warn!("No displays found");
            return;
        }
        for d in &self.displays {
            tracing::info!("Display: {}", d);
        }
    }

    pub fn displays(&self) -> &[Display] {
        &self.displays
    }

    pub fn get(&self, id: DisplayId) -> Option<&Display> {
        self.displays.iter().find(|d| d.id == id)
    }

    pub fn contains<W: WindowSystem>(&self, ws: &W, display: &Display, window: &Window) -> bool {
        ws.display_for_window(window.handle) == Some(display.id)
    }

    /// Native nearest-monitor lookup, falling back to the cached rect when
    /// the handle can no longer be queried.
    pub fn display_for_window<W: WindowSystem>(&self, ws: &W, window: &Window) -> Option<&Display> {
        ws.display_for_window(window.handle)
            .and_then(|id| self.get(id))
            .or_else(|| self.display_for_rect(&window.rect))
    }

    /// Display whose work area overlaps `rect` the most, or the one whose
    /// centre is closest when nothing overlaps.
    pub fn display_for_rect(&self, rect: &Rect) -> Option<&Display> {
        let best = self
            .displays
            .iter()
            .map(|d| (d, d.work_area.overlap_area(rect)))
            .filter(|(_, area)| *area > 0)
            .fold(None, |best: Option<(&Display, i64)>, candidate| match best {
                Some((_, area)) if area >= candidate.1 => best,
                _ => Some(candidate),
            });
        if let Some((display, _)) = best {
            return Some(display);
        }

        let (cx, cy) = rect.center();
        self.displays.iter().min_by_key(|d| {
            let (dx, dy) = d.work_area.center();
            let (dx, dy) = ((dx - cx) as i64, (dy - cy) as i64);
            dx * dx + dy * dy
        })
    }

    /// Partitions `windows` by display. Each window lands under exactly one
    /// display; displays without windows are included with an empty list.
    pub fn assign<'a, W, I>(&self, ws: &W, windows: I) -> Vec<(&Display, Vec<&'a Window>)>
    where
        W: WindowSystem,
        I: IntoIterator<Item = &'a Window>,
    {
        let mut assignment: Vec<(&Display, Vec<&'a Window>)> =
            self.displays.iter().map(|d| (d, Vec::new())).collect();
        for window in windows {
            let slot = match assignment.iter().position(|(d, _)| self.contains(ws, d, window)) {
                Some(index) => Some(index),
                None => self
                    .display_for_rect(&window.rect)
                    .and_then(|display| assignment.iter().position(|(d, _)| d.id == display.id)),
            };
            if let Some(index) = slot {
                assignment[index].1.push(window);
            }
        }
        assignment
    }
}
