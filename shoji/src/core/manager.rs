use anyhow::{bail, Context, Result};
use shoji_ipc::{StateInfo, WindowInfo};

use super::{Config, Display, DisplayId, DisplayTopology, Window, WindowHandle, WindowTracker};
use crate::event::Event;
use crate::layout::{create_strategy, StrategyKind, TilingStrategy, WindowMove};
use crate::platform::{WindowManipulator, WindowSystem};

/// Owns the tracked windows, the display topology and the drag marker, and
/// re-tiles displays as notifications arrive.
pub struct WindowManager<P: WindowSystem + WindowManipulator> {
    platform: P,
    tracker: WindowTracker,
    topology: DisplayTopology,
    strategy: Box<dyn TilingStrategy>,
    /// Window being dragged or resized; excluded from layout until released.
    movesize_handle: Option<WindowHandle>,
}

impl<P: WindowSystem + WindowManipulator> WindowManager<P> {
    pub fn new(platform: P, config: &Config, kind: StrategyKind) -> Self {
        let tracker = WindowTracker::new(config).with_style_logging(kind == StrategyKind::Debug);
        Self::with_strategy(platform, tracker, create_strategy(kind, config))
    }

    pub fn with_strategy(
        platform: P,
        tracker: WindowTracker,
        strategy: Box<dyn TilingStrategy>,
    ) -> Self {
        Self {
            platform,
            tracker,
            topology: DisplayTopology::new(),
            strategy,
            movesize_handle: None,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.tracker.windows()
    }

    pub fn displays(&self) -> &[Display] {
        self.topology.displays()
    }

    pub fn movesize_handle(&self) -> Option<WindowHandle> {
        self.movesize_handle
    }

    pub fn on_event(&mut self, event: Event) {
        tracing::debug!("Event: {:?}", event);
        match event {
            Event::ObjectCreated(handle)
            | Event::ObjectShown(handle)
            | Event::MinimizeEnded(handle) => self.on_window_appeared(handle),
            Event::ObjectDestroyed(handle)
            | Event::ObjectHidden(handle)
            | Event::MinimizeStarted(handle) => self.on_window_gone(handle),
            Event::LocationChanged(handle) => self.on_location_changed(handle),
            Event::MoveSizeStarted(handle) => self.on_movesize_start(handle),
            Event::MoveSizeEnded(handle) => self.on_movesize_end(handle),
        }
    }

    fn on_window_appeared(&mut self, handle: WindowHandle) {
        if !self.tracker.add(&self.platform, handle) {
            return;
        }
        if let Some(display_id) = self.display_id_for(handle) {
            self.apply_to_display(display_id);
        }
    }

    fn on_window_gone(&mut self, handle: WindowHandle) {
        let Some(window) = self.untrack(handle) else {
            return;
        };
        // The handle may be dead already; locate it by where it last was
        if let Some(display_id) = self.topology.display_for_rect(&window.rect).map(|d| d.id) {
            self.apply_to_display(display_id);
        }
    }

    fn on_location_changed(&mut self, handle: WindowHandle) {
        if self.movesize_handle == Some(handle) || !self.tracker.contains(handle) {
            return;
        }
        if !self.tracker.should_track(&self.platform, handle) {
            self.on_window_gone(handle);
            return;
        }

        let Some(window) = self.tracker.get_mut(handle) else {
            return;
        };
        let before = window.rect;
        if !window.refresh(&self.platform) {
            self.on_window_gone(handle);
            return;
        }
        if window.rect == before {
            return;
        }

        tracing::debug!("Window [{}] moved: {} -> {}", handle, before, window.rect);
        if let Some(display_id) = self.display_id_for(handle) {
            self.apply_to_display(display_id);
        }
    }

    fn on_movesize_start(&mut self, handle: WindowHandle) {
        if !self.tracker.contains(handle) {
            return;
        }
        tracing::debug!("Drag started: [{}]", handle);
        self.movesize_handle = Some(handle);
        if let Some(display_id) = self.display_id_for(handle) {
            self.apply_to_display(display_id);
        }
    }

    fn on_movesize_end(&mut self, handle: WindowHandle) {
        if self.movesize_handle != Some(handle) {
            return;
        }
        tracing::debug!("Drag ended: [{}]", handle);
        self.movesize_handle = None;

        let refreshed = self
            .tracker
            .get_mut(handle)
            .is_some_and(|w| w.refresh(&self.platform));
        if !refreshed {
            self.on_window_gone(handle);
            return;
        }
        if let Some(display_id) = self.display_id_for(handle) {
            self.apply_to_display(display_id);
        }
    }

    /// Re-enumerates displays and windows, then re-tiles every display.
    pub fn refresh(&mut self) {
        self.topology.enumerate(&self.platform);
        let delta = self.tracker.refresh(&self.platform);
        for window in &delta.removed {
            self.clear_drag(window.handle);
        }
        if delta.is_empty() {
            tracing::debug!("Refreshed: no window changes");
        } else {
            tracing::info!(
                "Refreshed: {} display(s), {} window(s) (+{}, -{})",
                self.topology.displays().len(),
                self.tracker.len(),
                delta.added.len(),
                delta.removed.len()
            );
        }
        self.apply_all();
    }

    pub fn apply_all(&mut self) {
        let ids: Vec<DisplayId> = self.topology.displays().iter().map(|d| d.id).collect();
        for display_id in ids {
            self.apply_to_display(display_id);
        }
    }

    /// Re-tiles one display, skipping the dragged window and topmost windows.
    /// Any other display that lost a window during the refresh is re-tiled too.
    pub fn apply_to_display(&mut self, display_id: DisplayId) {
        let mut targets = vec![display_id];
        for window in self.tracker.refresh_windows(&self.platform) {
            self.clear_drag(window.handle);
            if let Some(id) = self.topology.display_for_rect(&window.rect).map(|d| d.id) {
                if !targets.contains(&id) {
                    targets.push(id);
                }
            }
        }

        for id in targets {
            self.layout_display(id);
        }
    }

    fn layout_display(&mut self, display_id: DisplayId) {
        let Some(display) = self.topology.get(display_id).cloned() else {
            tracing::warn!("Unknown display: {}", display_id);
            return;
        };
        let active = self.platform.foreground_window();

        let moves = {
            let assignment = self.topology.assign(&self.platform, self.tracker.windows());
            let windows: Vec<&Window> = assignment
                .into_iter()
                .find(|(d, _)| d.id == display_id)
                .map(|(_, windows)| windows)
                .unwrap_or_default()
                .into_iter()
                .filter(|w| Some(w.handle) != self.movesize_handle && !w.topmost)
                .collect();
            self.strategy.apply(&display, &windows, active)
        };

        self.issue_moves(&moves);
    }

    fn issue_moves(&mut self, moves: &[WindowMove]) {
        for m in moves {
            match self.platform.move_window(m.handle, &m.to) {
                Ok(()) => {
                    tracing::debug!("Moved window [{}]: {} -> {}", m.handle, m.from, m.to);
                    if let Some(window) = self.tracker.get_mut(m.handle) {
                        window.rect = m.to;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to move window [{}] to {}: {}", m.handle, m.to, e);
                }
            }
        }
    }

    /// Flips the window in or out of the always-on-top band. Returns whether
    /// its topmost state changed.
    pub fn toggle_window_topmost(&mut self, handle: WindowHandle) -> Result<bool> {
        let Some(window) = self.tracker.get(handle) else {
            bail!("Window {} is not tracked", handle);
        };
        let was_topmost = window.topmost;

        self.platform
            .set_topmost(handle, !was_topmost)
            .with_context(|| format!("Failed to change topmost state of window {}", handle))?;

        let is_topmost = self
            .platform
            .window_style(handle)
            .map_or(!was_topmost, |s| s.topmost);
        if is_topmost == was_topmost {
            return Ok(false);
        }

        if let Some(window) = self.tracker.get_mut(handle) {
            window.topmost = is_topmost;
            tracing::info!(
                "Window [{}] {} {}",
                handle,
                window.pretty_title(),
                if is_topmost { "pinned on top" } else { "unpinned" }
            );
        }
        if let Some(display_id) = self.display_id_for(handle) {
            self.apply_to_display(display_id);
        }
        Ok(true)
    }

    /// Moves every tracked window back to where it was when first tracked.
    pub fn restore_positions(&mut self) {
        let moves: Vec<WindowMove> = self
            .tracker
            .windows()
            .map(|w| WindowMove {
                handle: w.handle,
                from: w.rect,
                to: w.initial_rect,
            })
            .collect();
        tracing::info!("Restoring {} window position(s)", moves.len());
        self.issue_moves(&moves);
    }

    pub fn window_infos(&self) -> Vec<WindowInfo> {
        self.tracker
            .windows()
            .map(|w| WindowInfo {
                id: w.handle.0,
                title: w.title.clone(),
                class_name: w.class_name.clone(),
                rect: w.rect,
                display_id: self
                    .topology
                    .display_for_window(&self.platform, w)
                    .map(|d| d.id.0),
                is_topmost: w.topmost,
                is_dragging: self.movesize_handle == Some(w.handle),
            })
            .collect()
    }

    pub fn state_info(&self) -> StateInfo {
        StateInfo {
            strategy: self.strategy.name().to_string(),
            display_count: self.topology.displays().len(),
            window_count: self.tracker.len(),
            dragging_window_id: self.movesize_handle.map(|h| h.0),
        }
    }

    fn display_id_for(&self, handle: WindowHandle) -> Option<DisplayId> {
        let window = self.tracker.get(handle)?;
        self.topology
            .display_for_window(&self.platform, window)
            .map(|d| d.id)
    }

    fn untrack(&mut self, handle: WindowHandle) -> Option<Window> {
        let window = self.tracker.remove(handle)?;
        self.clear_drag(handle);
        Some(window)
    }

    fn clear_drag(&mut self, handle: WindowHandle) {
        if self.movesize_handle == Some(handle) {
            tracing::debug!("Drag cancelled: [{}]", handle);
            self.movesize_handle = None;
        }
    }
}
