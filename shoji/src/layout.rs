use shoji_ipc::Rect;
use shoji_layout_bsp::BspLayout;

use crate::core::{Config, Display, Window, WindowHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMove {
    pub handle: WindowHandle,
    pub from: Rect,
    pub to: Rect,
}

/// Computes placements for the windows of one display.
pub trait TilingStrategy {
    fn name(&self) -> &'static str;

    /// Returns one move per window it chooses to place. `active` is the
    /// foreground window, if any.
    fn apply(
        &self,
        target: &Display,
        windows: &[&Window],
        active: Option<WindowHandle>,
    ) -> Vec<WindowMove>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Bsp,
    /// Logs what would be tiled, never moves anything.
    Debug,
}

pub fn create_strategy(kind: StrategyKind, config: &Config) -> Box<dyn TilingStrategy> {
    match kind {
        StrategyKind::Bsp => Box::new(BspStrategy::new(config)),
        StrategyKind::Debug => Box::new(DebugStrategy),
    }
}

pub struct BspStrategy {
    layout: BspLayout,
}

impl BspStrategy {
    pub fn new(config: &Config) -> Self {
        Self {
            layout: BspLayout::new(
                config.partition_split_ratio,
                config.display_padding,
                config.window_margin,
            ),
        }
    }
}

impl TilingStrategy for BspStrategy {
    fn name(&self) -> &'static str {
        "bsp"
    }

    fn apply(
        &self,
        target: &Display,
        windows: &[&Window],
        _active: Option<WindowHandle>,
    ) -> Vec<WindowMove> {
        let tiled: Vec<(WindowHandle, Rect)> = windows
            .iter()
            .filter(|w| !w.topmost)
            .map(|w| (w.handle, w.rect))
            .collect();
        tracing::debug!(
            "Partitioning {} window(s) on display {}",
            tiled.len(),
            target
        );

        self.layout
            .generate_layout(target.work_area, &tiled)
            .into_iter()
            .filter_map(|(handle, to)| {
                let from = tiled.iter().find(|(h, _)| *h == handle)?.1;
                Some(WindowMove { handle, from, to })
            })
            .collect()
    }
}

pub struct DebugStrategy;

impl TilingStrategy for DebugStrategy {
    fn name(&self) -> &'static str {
        "debug"
    }

    fn apply(
        &self,
        target: &Display,
        windows: &[&Window],
        active: Option<WindowHandle>,
    ) -> Vec<WindowMove> {
        tracing::debug!("Display {}: {} window(s)", target, windows.len());
        for window in windows {
            tracing::debug!(
                "  [{}] {} {}{}",
                window.handle,
                window.pretty_title(),
                window.rect,
                if active == Some(window.handle) { " *" } else { "" }
            );
        }
        Vec::new()
    }
}
