use std::fmt;
use std::hash::{Hash, Hasher};

use shoji_ipc::Rect;

use crate::platform::WindowSystem;

/// Opaque native window handle. Never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub isize);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque native monitor handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(pub isize);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Style bits and visibility flags of a top-level window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStyle {
    pub visible: bool,
    pub iconic: bool,
    pub zoomed: bool,
    pub popup: bool,
    pub minimize_box: bool,
    pub maximize_box: bool,
    pub caption: bool,
    pub topmost: bool,
}

impl WindowStyle {
    /// Visible, restored, non-popup windows with both minimize and maximize
    /// boxes. Captionless windows are accepted.
    pub fn is_tileable(&self) -> bool {
        self.visible
            && !self.iconic
            && !self.zoomed
            && !self.popup
            && self.minimize_box
            && self.maximize_box
    }
}

impl fmt::Display for WindowStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visible={} iconic={} zoomed={} popup={} minimize_box={} maximize_box={} caption={} topmost={}",
            self.visible,
            self.iconic,
            self.zoomed,
            self.popup,
            self.minimize_box,
            self.maximize_box,
            self.caption,
            self.topmost
        )
    }
}

#[derive(Debug, Clone)]
pub struct Window {
    pub handle: WindowHandle,
    pub rect: Rect,
    pub title: String,
    pub class_name: String,
    pub topmost: bool,
    /// Placement when tracking began, restored on exit.
    pub initial_rect: Rect,
}

impl Window {
    /// Snapshots a live window. Returns `None` if the handle has vanished.
    pub fn query<W: WindowSystem>(ws: &W, handle: WindowHandle) -> Option<Self> {
        let rect = ws.window_rect(handle)?;
        let style = ws.window_style(handle)?;
        Some(Self {
            handle,
            rect,
            title: ws.window_title(handle).unwrap_or_default(),
            class_name: ws.window_class_name(handle).unwrap_or_default(),
            topmost: style.topmost,
            initial_rect: rect,
        })
    }

    /// Re-reads rect, title and topmost flag. Returns false if the window is gone.
    pub fn refresh<W: WindowSystem>(&mut self, ws: &W) -> bool {
        let (Some(rect), Some(style)) = (ws.window_rect(self.handle), ws.window_style(self.handle))
        else {
            return false;
        };
        self.rect = rect;
        self.topmost = style.topmost;
        if let Some(title) = ws.window_title(self.handle) {
            self.title = title;
        }
        true
    }

    /// "document.txt - Notepad" becomes "Notepad - document.txt".
    pub fn pretty_title(&self) -> String {
        let mut parts: Vec<&str> = self.title.split(" - ").collect();
        parts.reverse();
        parts.join(" - ")
    }
}

impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for Window {}

impl Hash for Window {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{create_test_window, MockPlatform};

    fn tileable() -> WindowStyle {
        WindowStyle {
            visible: true,
            minimize_box: true,
            maximize_box: true,
            caption: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_style_is_tileable() {
        assert!(tileable().is_tileable());
        assert!(WindowStyle {
            caption: false,
            ..tileable()
        }
        .is_tileable());
    }

    #[test]
    fn test_style_rejects_each_rule() {
        assert!(!WindowStyle {
            visible: false,
            ..tileable()
        }
        .is_tileable());
        assert!(!WindowStyle {
            iconic: true,
            ..tileable()
        }
        .is_tileable());
        assert!(!WindowStyle {
            zoomed: true,
            ..tileable()
        }
        .is_tileable());
        assert!(!WindowStyle {
            popup: true,
            ..tileable()
        }
        .is_tileable());
        assert!(!WindowStyle {
            minimize_box: false,
            ..tileable()
        }
        .is_tileable());
        assert!(!WindowStyle {
            maximize_box: false,
            ..tileable()
        }
        .is_tileable());
    }

    #[test]
    fn test_style_topmost_does_not_affect_eligibility() {
        assert!(WindowStyle {
            topmost: true,
            ..tileable()
        }
        .is_tileable());
    }

    #[test]
    fn test_query_snapshots_window() {
        let ws = MockPlatform::new().with_windows(vec![create_test_window(
            10, "Notepad", 100, 100, 900, 700,
        )]);
        let window = Window::query(&ws, WindowHandle(10)).unwrap();

        assert_eq!(window.handle, WindowHandle(10));
        assert_eq!(window.rect, Rect::new(100, 100, 900, 700));
        assert_eq!(window.initial_rect, window.rect);
        assert_eq!(window.class_name, "Notepad");
        assert!(!window.topmost);
    }

    #[test]
    fn test_query_vanished_window() {
        let ws = MockPlatform::new();
        assert!(Window::query(&ws, WindowHandle(10)).is_none());
    }

    #[test]
    fn test_refresh_updates_rect_but_keeps_initial_rect() {
        let ws = MockPlatform::new().with_windows(vec![create_test_window(
            10, "Notepad", 0, 0, 800, 600,
        )]);
        let mut window = Window::query(&ws, WindowHandle(10)).unwrap();

        ws.set_rect(WindowHandle(10), Rect::new(50, 50, 850, 650));
        ws.set_style(WindowHandle(10), |s| s.topmost = true);
        assert!(window.refresh(&ws));
        assert_eq!(window.rect, Rect::new(50, 50, 850, 650));
        assert_eq!(window.initial_rect, Rect::new(0, 0, 800, 600));
        assert!(window.topmost);
    }

    #[test]
    fn test_refresh_vanished_window() {
        let ws = MockPlatform::new().with_windows(vec![create_test_window(
            10, "Notepad", 0, 0, 800, 600,
        )]);
        let mut window = Window::query(&ws, WindowHandle(10)).unwrap();
        ws.remove_window(WindowHandle(10));
        assert!(!window.refresh(&ws));
    }

    #[test]
    fn test_pretty_title() {
        let ws = MockPlatform::new().with_windows(vec![create_test_window(
            10, "Notepad", 0, 0, 800, 600,
        )]);
        let mut window = Window::query(&ws, WindowHandle(10)).unwrap();

        window.title = "notes.txt - Notepad".to_string();
        assert_eq!(window.pretty_title(), "Notepad - notes.txt");

        window.title = "Inbox - me@example.com - Mail".to_string();
        assert_eq!(window.pretty_title(), "Mail - me@example.com - Inbox");

        window.title = "Calculator".to_string();
        assert_eq!(window.pretty_title(), "Calculator");
    }

    #[test]
    fn test_window_equality_by_handle() {
        let ws = MockPlatform::new().with_windows(vec![create_test_window(
            10, "Notepad", 0, 0, 800, 600,
        )]);
        let a = Window::query(&ws, WindowHandle(10)).unwrap();
        let mut b = a.clone();
        b.rect = Rect::new(1, 2, 3, 4);
        b.title = "other".to_string();
        assert_eq!(a, b);
    }
}
