//! Binary space partition layout.
//!
//! A display's tiling region is split in half repeatedly until every window
//! owns one cell. At each split, windows are handed to the half they already
//! overlap most, with the two halves kept within one window of each other.

use shoji_ipc::{Inset, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
    /// Side-by-side halves.
    Vertical,
    /// Stacked halves.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BspLayout {
    pub split_ratio: f64,
    pub display_padding: Inset,
    pub window_margin: Inset,
}

impl Default for BspLayout {
    fn default() -> Self {
        Self {
            split_ratio: 1.0,
            display_padding: Inset::default(),
            window_margin: Inset::default(),
        }
    }
}

impl BspLayout {
    pub fn new(split_ratio: f64, display_padding: Inset, window_margin: Inset) -> Self {
        Self {
            split_ratio,
            display_padding,
            window_margin,
        }
    }

    /// Computes one target rectangle per window inside `work_area`.
    ///
    /// Each window's current rectangle decides which half it lands in, so
    /// feeding the result back in produces the same layout.
    pub fn generate_layout<Id: Copy>(
        &self,
        work_area: Rect,
        windows: &[(Id, Rect)],
    ) -> Vec<(Id, Rect)> {
        let region = work_area.inset(&self.display_padding);
        let mut placements = Vec::with_capacity(windows.len());
        self.partition(region, windows.to_vec(), &mut placements);
        placements
    }

    fn partition<Id: Copy>(
        &self,
        region: Rect,
        windows: Vec<(Id, Rect)>,
        placements: &mut Vec<(Id, Rect)>,
    ) {
        match windows.len() {
            0 => {}
            1 => placements.push((windows[0].0, region.inset(&self.window_margin))),
            _ => {
                let (first, second) = split_region(region, self.split_ratio);
                let (first_windows, second_windows) = assign_sides(first, second, windows);
                self.partition(first, first_windows, placements);
                self.partition(second, second_windows, placements);
            }
        }
    }
}

/// Direction in which `region` is halved for the given ratio.
pub fn split_direction(region: Rect, split_ratio: f64) -> SplitDirection {
    let half_width = region.width() / 2;
    let half_height = region.height() / 2;
    if half_width as f64 > half_height as f64 * split_ratio {
        SplitDirection::Vertical
    } else {
        SplitDirection::Horizontal
    }
}

pub fn split_region(region: Rect, split_ratio: f64) -> (Rect, Rect) {
    let Rect {
        left,
        top,
        right,
        bottom,
    } = region;
    match split_direction(region, split_ratio) {
        SplitDirection::Vertical => {
            let mid = left + region.width() / 2;
            (
                Rect::new(left, top, mid, bottom),
                Rect::new(mid, top, right, bottom),
            )
        }
        SplitDirection::Horizontal => {
            let mid = top + region.height() / 2;
            (
                Rect::new(left, top, right, mid),
                Rect::new(left, mid, right, bottom),
            )
        }
    }
}

/// Positive scores favour `second`, negative or zero favour `first`.
pub fn preference(rect: &Rect, first: &Rect, second: &Rect) -> i64 {
    rect.overlap_area(second) - rect.overlap_area(first)
}

/// Splits `windows` between two regions.
///
/// Strongest preferences are placed first; neither side takes more than
/// `ceil(n / 2)` windows.
pub fn assign_sides<Id: Copy>(
    first: Rect,
    second: Rect,
    windows: Vec<(Id, Rect)>,
) -> (Vec<(Id, Rect)>, Vec<(Id, Rect)>) {
    let max_per_side = windows.len().div_ceil(2);

    let mut scored: Vec<(i64, (Id, Rect))> = windows
        .into_iter()
        .map(|window| (preference(&window.1, &first, &second), window))
        .collect();
    // sort_by is stable, equal preferences keep their input order
    scored.sort_by(|a, b| b.0.abs().cmp(&a.0.abs()));

    let mut first_windows = Vec::with_capacity(max_per_side);
    let mut second_windows = Vec::with_capacity(max_per_side);
    for (score, window) in scored {
        let favoured = if score <= 0 { Side::First } else { Side::Second };
        let side = match favoured {
            Side::First if first_windows.len() >= max_per_side => Side::Second,
            Side::Second if second_windows.len() >= max_per_side => Side::First,
            side => side,
        };
        match side {
            Side::First => first_windows.push(window),
            Side::Second => second_windows.push(window),
        }
    }

    (first_windows, second_windows)
}
