use anyhow::Result;
use shoji_ipc::Rect;

use crate::core::{DisplayId, WindowHandle, WindowStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayInfo {
    pub id: DisplayId,
    pub work_area: Rect,
    pub is_primary: bool,
}

/// Trait for querying window and display information from the system.
/// This abstraction allows mocking in tests.
///
/// Queries return `None` when the handle is no longer valid.
pub trait WindowSystem {
    /// All top-level windows, in z-order.
    fn enumerate_windows(&self) -> Vec<WindowHandle>;
    fn enumerate_displays(&self) -> Vec<DisplayInfo>;
    fn window_style(&self, handle: WindowHandle) -> Option<WindowStyle>;
    fn window_rect(&self, handle: WindowHandle) -> Option<Rect>;
    fn window_title(&self, handle: WindowHandle) -> Option<String>;
    fn window_class_name(&self, handle: WindowHandle) -> Option<String>;
    /// Nearest monitor to the window.
    fn display_for_window(&self, handle: WindowHandle) -> Option<DisplayId>;
    fn foreground_window(&self) -> Option<WindowHandle>;
}

/// Trait for manipulating windows (side effects).
/// This abstraction allows mocking in tests.
pub trait WindowManipulator {
    fn move_window(&self, handle: WindowHandle, rect: &Rect) -> Result<()>;
    /// Moves the window into or out of the always-on-top band.
    fn set_topmost(&self, handle: WindowHandle, topmost: bool) -> Result<()>;
}

/// Win32 implementation of WindowSystem and WindowManipulator
#[cfg(windows)]
#[derive(Debug, Default)]
pub struct Win32Platform;

#[cfg(windows)]
impl WindowSystem for Win32Platform {
    fn enumerate_windows(&self) -> Vec<WindowHandle> {
        crate::win32::enumerate_windows()
    }

    fn enumerate_displays(&self) -> Vec<DisplayInfo> {
        crate::win32::enumerate_displays()
    }

    fn window_style(&self, handle: WindowHandle) -> Option<WindowStyle> {
        crate::win32::window_style(handle)
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<Rect> {
        crate::win32::window_rect(handle)
    }

    fn window_title(&self, handle: WindowHandle) -> Option<String> {
        crate::win32::window_title(handle)
    }

    fn window_class_name(&self, handle: WindowHandle) -> Option<String> {
        crate::win32::window_class_name(handle)
    }

    fn display_for_window(&self, handle: WindowHandle) -> Option<DisplayId> {
        crate::win32::display_for_window(handle)
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        crate::win32::foreground_window()
    }
}

#[cfg(windows)]
impl WindowManipulator for Win32Platform {
    fn move_window(&self, handle: WindowHandle, rect: &Rect) -> Result<()> {
        crate::win32::move_window(handle, rect)
    }

    fn set_topmost(&self, handle: WindowHandle, topmost: bool) -> Result<()> {
        crate::win32::set_topmost(handle, topmost)
    }
}

#[cfg(test)]
pub mod mock {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use anyhow::bail;

    use super::*;

    #[derive(Debug, Clone)]
    pub struct MockWindow {
        pub handle: WindowHandle,
        pub rect: Rect,
        pub title: String,
        pub class_name: String,
        pub style: WindowStyle,
    }

    #[derive(Debug, Default)]
    struct MockState {
        windows: Vec<MockWindow>,
        displays: Vec<DisplayInfo>,
        moves: Vec<(WindowHandle, Rect)>,
        failing_moves: HashSet<WindowHandle>,
    }

    /// In-memory desktop. Moves are recorded and applied to the window table.
    #[derive(Debug, Default)]
    pub struct MockPlatform {
        state: RefCell<MockState>,
    }

    impl MockPlatform {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_windows(self, windows: Vec<MockWindow>) -> Self {
            self.state.borrow_mut().windows = windows;
            self
        }

        pub fn with_displays(self, displays: Vec<DisplayInfo>) -> Self {
            self.state.borrow_mut().displays = displays;
            self
        }

        pub fn add_window(&self, window: MockWindow) {
            self.state.borrow_mut().windows.push(window);
        }

        pub fn remove_window(&self, handle: WindowHandle) {
            self.state
                .borrow_mut()
                .windows
                .retain(|w| w.handle != handle);
        }

        pub fn set_rect(&self, handle: WindowHandle, rect: Rect) {
            let mut state = self.state.borrow_mut();
            if let Some(w) = state.windows.iter_mut().find(|w| w.handle == handle) {
                w.rect = rect;
            }
        }

        pub fn set_style(&self, handle: WindowHandle, f: impl FnOnce(&mut WindowStyle)) {
            let mut state = self.state.borrow_mut();
            if let Some(w) = state.windows.iter_mut().find(|w| w.handle == handle) {
                f(&mut w.style);
            }
        }

        pub fn set_displays(&self, displays: Vec<DisplayInfo>) {
            self.state.borrow_mut().displays = displays;
        }

        pub fn fail_moves_for(&self, handle: WindowHandle) {
            self.state.borrow_mut().failing_moves.insert(handle);
        }

        pub fn moves(&self) -> Vec<(WindowHandle, Rect)> {
            self.state.borrow().moves.clone()
        }

        pub fn moved_handles(&self) -> Vec<WindowHandle> {
            self.state.borrow().moves.iter().map(|(h, _)| *h).collect()
        }

        pub fn clear_moves(&self) {
            self.state.borrow_mut().moves.clear();
        }

        pub fn rect_of(&self, handle: WindowHandle) -> Option<Rect> {
            self.window(handle).map(|w| w.rect)
        }

        fn window(&self, handle: WindowHandle) -> Option<MockWindow> {
            self.state
                .borrow()
                .windows
                .iter()
                .find(|w| w.handle == handle)
                .cloned()
        }
    }

    impl WindowSystem for MockPlatform {
        fn enumerate_windows(&self) -> Vec<WindowHandle> {
            self.state.borrow().windows.iter().map(|w| w.handle).collect()
        }

        fn enumerate_displays(&self) -> Vec<DisplayInfo> {
            self.state.borrow().displays.clone()
        }

        fn window_style(&self, handle: WindowHandle) -> Option<WindowStyle> {
            self.window(handle).map(|w| w.style)
        }

        fn window_rect(&self, handle: WindowHandle) -> Option<Rect> {
            self.rect_of(handle)
        }

        fn window_title(&self, handle: WindowHandle) -> Option<String> {
            self.window(handle).map(|w| w.title)
        }

        fn window_class_name(&self, handle: WindowHandle) -> Option<String> {
            self.window(handle).map(|w| w.class_name)
        }

        /// Display with the largest overlap, else the first one.
        fn display_for_window(&self, handle: WindowHandle) -> Option<DisplayId> {
            let rect = self.rect_of(handle)?;
            let state = self.state.borrow();
            state
                .displays
                .iter()
                .max_by_key(|d| d.work_area.overlap_area(&rect))
                .filter(|d| d.work_area.overlap_area(&rect) > 0)
                .or_else(|| state.displays.first())
                .map(|d| d.id)
        }

        fn foreground_window(&self) -> Option<WindowHandle> {
            None
        }
    }

    impl WindowManipulator for MockPlatform {
        fn move_window(&self, handle: WindowHandle, rect: &Rect) -> Result<()> {
            let mut state = self.state.borrow_mut();
            if state.failing_moves.contains(&handle) {
                bail!("Access is denied");
            }
            let Some(window) = state.windows.iter_mut().find(|w| w.handle == handle) else {
                bail!("Invalid window handle");
            };
            window.rect = *rect;
            state.moves.push((handle, *rect));
            Ok(())
        }

        fn set_topmost(&self, handle: WindowHandle, topmost: bool) -> Result<()> {
            let mut state = self.state.borrow_mut();
            let Some(window) = state.windows.iter_mut().find(|w| w.handle == handle) else {
                bail!("Invalid window handle");
            };
            window.style.topmost = topmost;
            Ok(())
        }
    }

    pub fn tileable_style() -> WindowStyle {
        WindowStyle {
            visible: true,
            minimize_box: true,
            maximize_box: true,
            caption: true,
            ..Default::default()
        }
    }

    pub fn create_test_display(
        id: isize,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) -> DisplayInfo {
        DisplayInfo {
            id: DisplayId(id),
            work_area: Rect::new(left, top, right, bottom),
            is_primary: id == 1,
        }
    }

    pub fn create_test_window(
        handle: isize,
        class_name: &str,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) -> MockWindow {
        MockWindow {
            handle: WindowHandle(handle),
            rect: Rect::new(left, top, right, bottom),
            title: format!("{} Window", class_name),
            class_name: class_name.to_string(),
            style: tileable_style(),
        }
    }
}
