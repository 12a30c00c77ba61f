use std::mem::size_of;

use shoji_ipc::Rect;
use windows::Win32::Foundation::{BOOL, LPARAM, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, MonitorFromWindow, HDC, HMONITOR, MONITORINFO,
    MONITOR_DEFAULTTONEAREST,
};

use super::window::hwnd;
use crate::core::{DisplayId, WindowHandle};
use crate::platform::DisplayInfo;

const MONITORINFOF_PRIMARY: u32 = 1;

unsafe extern "system" fn enum_monitor_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let displays = &mut *(lparam.0 as *mut Vec<DisplayInfo>);
    let mut info = MONITORINFO {
        cbSize: size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    if !GetMonitorInfoW(hmonitor, &mut info).as_bool() {
        tracing::warn!("GetMonitorInfoW failed for monitor {}", hmonitor.0 as isize);
        return TRUE;
    }

    let work = info.rcWork;
    displays.push(DisplayInfo {
        id: DisplayId(hmonitor.0 as isize),
        work_area: Rect::new(work.left, work.top, work.right, work.bottom),
        is_primary: info.dwFlags & MONITORINFOF_PRIMARY != 0,
    });
    TRUE
}

pub fn enumerate_displays() -> Vec<DisplayInfo> {
    let mut displays: Vec<DisplayInfo> = Vec::new();
    let ok = unsafe {
        EnumDisplayMonitors(
            HDC::default(),
            None,
            Some(enum_monitor_proc),
            LPARAM(&mut displays as *mut Vec<DisplayInfo> as isize),
        )
    };
    if !ok.as_bool() {
        tracing::warn!("EnumDisplayMonitors failed");
    }
    displays
}

pub fn display_for_window(handle: WindowHandle) -> Option<DisplayId> {
    let hmonitor = unsafe { MonitorFromWindow(hwnd(handle), MONITOR_DEFAULTTONEAREST) };
    let raw = hmonitor.0 as isize;
    (raw != 0).then_some(DisplayId(raw))
}
