use crate::core::WindowHandle;

pub const EVENT_MIN: u32 = 0x0000_0001;
pub const EVENT_MAX: u32 = 0x7FFF_FFFF;

pub const EVENT_SYSTEM_MOVESIZESTART: u32 = 0x000A;
pub const EVENT_SYSTEM_MOVESIZEEND: u32 = 0x000B;
pub const EVENT_SYSTEM_MINIMIZESTART: u32 = 0x0016;
pub const EVENT_SYSTEM_MINIMIZEEND: u32 = 0x0017;
pub const EVENT_OBJECT_CREATE: u32 = 0x8000;
pub const EVENT_OBJECT_DESTROY: u32 = 0x8001;
pub const EVENT_OBJECT_SHOW: u32 = 0x8002;
pub const EVENT_OBJECT_HIDE: u32 = 0x8003;
pub const EVENT_OBJECT_LOCATIONCHANGE: u32 = 0x800B;

pub const OBJID_WINDOW: i32 = 0;

/// Window notification delivered by the event bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ObjectCreated(WindowHandle),
    ObjectDestroyed(WindowHandle),
    ObjectShown(WindowHandle),
    ObjectHidden(WindowHandle),
    LocationChanged(WindowHandle),
    MoveSizeStarted(WindowHandle),
    MoveSizeEnded(WindowHandle),
    MinimizeStarted(WindowHandle),
    MinimizeEnded(WindowHandle),
}

impl Event {
    /// Translates a raw WinEvent callback.
    ///
    /// Notifications about child objects (carets, scroll bars, cursors) and
    /// null handles are dropped here.
    pub fn from_raw(code: u32, hwnd: isize, object_id: i32) -> Option<Self> {
        if hwnd == 0 || object_id != OBJID_WINDOW {
            return None;
        }
        let handle = WindowHandle(hwnd);
        let event = match code {
            EVENT_OBJECT_CREATE => Event::ObjectCreated(handle),
            EVENT_OBJECT_DESTROY => Event::ObjectDestroyed(handle),
            EVENT_OBJECT_SHOW => Event::ObjectShown(handle),
            EVENT_OBJECT_HIDE => Event::ObjectHidden(handle),
            EVENT_OBJECT_LOCATIONCHANGE => Event::LocationChanged(handle),
            EVENT_SYSTEM_MOVESIZESTART => Event::MoveSizeStarted(handle),
            EVENT_SYSTEM_MOVESIZEEND => Event::MoveSizeEnded(handle),
            EVENT_SYSTEM_MINIMIZESTART => Event::MinimizeStarted(handle),
            EVENT_SYSTEM_MINIMIZEEND => Event::MinimizeEnded(handle),
            _ => return None,
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_maps_handled_codes() {
        let h = WindowHandle(0x1234);
        let cases = [
            (EVENT_OBJECT_CREATE, Event::ObjectCreated(h)),
            (EVENT_OBJECT_DESTROY, Event::ObjectDestroyed(h)),
            (EVENT_OBJECT_SHOW, Event::ObjectShown(h)),
            (EVENT_OBJECT_HIDE, Event::ObjectHidden(h)),
            (EVENT_OBJECT_LOCATIONCHANGE, Event::LocationChanged(h)),
            (EVENT_SYSTEM_MOVESIZESTART, Event::MoveSizeStarted(h)),
            (EVENT_SYSTEM_MOVESIZEEND, Event::MoveSizeEnded(h)),
            (EVENT_SYSTEM_MINIMIZESTART, Event::MinimizeStarted(h)),
            (EVENT_SYSTEM_MINIMIZEEND, Event::MinimizeEnded(h)),
        ];
        for (code, expected) in cases {
            assert_eq!(Event::from_raw(code, 0x1234, OBJID_WINDOW), Some(expected));
        }
    }

    #[test]
    fn test_from_raw_ignores_null_handle() {
        assert_eq!(Event::from_raw(EVENT_OBJECT_CREATE, 0, OBJID_WINDOW), None);
    }

    #[test]
    fn test_from_raw_ignores_child_objects() {
        // OBJID_CARET
        assert_eq!(Event::from_raw(EVENT_OBJECT_LOCATIONCHANGE, 0x1234, -8), None);
        // Child element id
        assert_eq!(Event::from_raw(EVENT_OBJECT_SHOW, 0x1234, 3), None);
    }

    #[test]
    fn test_from_raw_ignores_unhandled_codes() {
        // EVENT_SYSTEM_FOREGROUND
        assert_eq!(Event::from_raw(0x0003, 0x1234, OBJID_WINDOW), None);
        // EVENT_OBJECT_NAMECHANGE
        assert_eq!(Event::from_raw(0x800C, 0x1234, OBJID_WINDOW), None);
    }
}
