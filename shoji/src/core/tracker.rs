use std::collections::{BTreeMap, HashSet};

use super::{Config, Window, WindowHandle};
use crate::platform::WindowSystem;

#[derive(Debug, Default)]
pub struct TrackerDelta {
    pub added: Vec<WindowHandle>,
    pub removed: Vec<Window>,
}

impl TrackerDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Registry of the windows currently under management.
///
/// Keyed by handle in a sorted map so layout input order is stable across
/// passes.
pub struct WindowTracker {
    windows: BTreeMap<WindowHandle, Window>,
    ignored_classnames: Vec<String>,
    log_styles: bool,
}

impl WindowTracker {
    pub fn new(config: &Config) -> Self {
        Self {
            windows: BTreeMap::new(),
            ignored_classnames: config.ignored_classnames.clone(),
            log_styles: false,
        }
    }

    /// Logs the full style map of every newly tracked window.
    pub fn with_style_logging(mut self, enabled: bool) -> Self {
        self.log_styles = enabled;
        self
    }

    pub fn should_track<W: WindowSystem>(&self, ws: &W, handle: WindowHandle) -> bool {
        is_eligible(ws, handle, &self.ignored_classnames)
    }

    /// Starts tracking `handle` if it is eligible and not yet tracked.
    pub fn add<W: WindowSystem>(&mut self, ws: &W, handle: WindowHandle) -> bool {
        if self.windows.contains_key(&handle) || !self.should_track(ws, handle) {
            return false;
        }
        let Some(window) = Window::query(ws, handle) else {
            return false;
        };

        tracing::info!(
            "Window tracked: [{}] {} ({})",
            handle,
            window.pretty_title(),
            window.class_name
        );
        if self.log_styles {
            if let Some(style) = ws.window_style(handle) {
                tracing::debug!("  [{}] {} {}", handle, window.rect, style);
            }
        }

        self.windows.insert(handle, window);
        true
    }

    pub fn remove(&mut self, handle: WindowHandle) -> Option<Window> {
        let window = self.windows.remove(&handle)?;
        tracing::info!(
            "Window untracked: [{}] {} ({})",
            handle,
            window.pretty_title(),
            window.class_name
        );
        Some(window)
    }

    /// Reconciles the tracked set with every top-level window on the system.
    pub fn refresh<W: WindowSystem>(&mut self, ws: &W) -> TrackerDelta {
        let eligible: Vec<WindowHandle> = ws
            .enumerate_windows()
            .into_iter()
            .filter(|&h| self.should_track(ws, h))
            .collect();
        let eligible_set: HashSet<WindowHandle> = eligible.iter().copied().collect();

        let stale: Vec<WindowHandle> = self
            .windows
            .keys()
            .filter(|h| !eligible_set.contains(h))
            .copied()
            .collect();

        let mut delta = TrackerDelta::default();
        for handle in stale {
            if let Some(window) = self.remove(handle) {
                delta.removed.push(window);
            }
        }
        for handle in eligible {
            if self.add(ws, handle) {
                delta.added.push(handle);
            }
        }
        delta
    }

    /// Re-queries every tracked window, dropping those that vanished or are
    /// no longer eligible (maximized, minimized, hidden). Returns the dropped
    /// windows with their last known rect.
    pub fn refresh_windows<W: WindowSystem>(&mut self, ws: &W) -> Vec<Window> {
        let mut stale = Vec::new();
        for (handle, window) in self.windows.iter_mut() {
            if !window.refresh(ws) {
                tracing::warn!("Window vanished: [{}] {}", handle, window.pretty_title());
                stale.push(*handle);
            } else if !is_eligible(ws, *handle, &self.ignored_classnames) {
                tracing::info!(
                    "Window no longer eligible: [{}] {}",
                    handle,
                    window.pretty_title()
                );
                stale.push(*handle);
            }
        }
        stale
            .into_iter()
            .filter_map(|handle| self.remove(handle))
            .collect()
    }

    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.windows.contains_key(&handle)
    }

    pub fn get(&self, handle: WindowHandle) -> Option<&Window> {
        self.windows.get(&handle)
    }

    pub fn get_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        self.windows.get_mut(&handle)
    }

    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }
}

/// Any failed query makes the window ineligible.
fn is_eligible<W: WindowSystem>(ws: &W, handle: WindowHandle, ignored: &[String]) -> bool {
    let Some(style) = ws.window_style(handle) else {
        return false;
    };
    if !style.is_tileable() {
        return false;
    }
    match ws.window_class_name(handle) {
        Some(class_name) => !ignored.iter().any(|c| *c == class_name),
        None => false,
    }
}
