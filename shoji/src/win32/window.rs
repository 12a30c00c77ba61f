use std::ffi::c_void;

use anyhow::{Context, Result};
use shoji_ipc::Rect;
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT, TRUE};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClassNameW, GetForegroundWindow, GetWindowLongW, GetWindowRect,
    GetWindowTextLengthW, GetWindowTextW, IsIconic, IsWindow, IsWindowVisible, IsZoomed,
    MoveWindow, SetWindowPos, GWL_EXSTYLE, GWL_STYLE, HWND_NOTOPMOST, HWND_TOPMOST,
    SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, WS_CAPTION, WS_EX_TOPMOST, WS_MAXIMIZEBOX,
    WS_MINIMIZEBOX, WS_POPUP,
};

use crate::core::{WindowHandle, WindowStyle};

pub(crate) fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

fn is_window(handle: WindowHandle) -> bool {
    unsafe { IsWindow(hwnd(handle)).as_bool() }
}

unsafe extern "system" fn enum_window_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let handles = &mut *(lparam.0 as *mut Vec<WindowHandle>);
    handles.push(WindowHandle(hwnd.0 as isize));
    TRUE
}

pub fn enumerate_windows() -> Vec<WindowHandle> {
    let mut handles: Vec<WindowHandle> = Vec::new();
    let result = unsafe {
        EnumWindows(
            Some(enum_window_proc),
            LPARAM(&mut handles as *mut Vec<WindowHandle> as isize),
        )
    };
    if let Err(e) = result {
        tracing::warn!("EnumWindows failed: {}", e);
    }
    handles
}

pub fn window_style(handle: WindowHandle) -> Option<WindowStyle> {
    if !is_window(handle) {
        return None;
    }
    let hwnd = hwnd(handle);
    unsafe {
        let style = GetWindowLongW(hwnd, GWL_STYLE) as u32;
        let ex_style = GetWindowLongW(hwnd, GWL_EXSTYLE) as u32;
        Some(WindowStyle {
            visible: IsWindowVisible(hwnd).as_bool(),
            iconic: IsIconic(hwnd).as_bool(),
            zoomed: IsZoomed(hwnd).as_bool(),
            popup: style & WS_POPUP.0 != 0,
            minimize_box: style & WS_MINIMIZEBOX.0 != 0,
            maximize_box: style & WS_MAXIMIZEBOX.0 != 0,
            caption: style & WS_CAPTION.0 == WS_CAPTION.0,
            topmost: ex_style & WS_EX_TOPMOST.0 != 0,
        })
    }
}

pub fn window_rect(handle: WindowHandle) -> Option<Rect> {
    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd(handle), &mut rect) }.ok()?;
    Some(Rect::new(rect.left, rect.top, rect.right, rect.bottom))
}

pub fn window_title(handle: WindowHandle) -> Option<String> {
    if !is_window(handle) {
        return None;
    }
    let hwnd = hwnd(handle);
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return Some(String::new());
    }
    let mut buffer = vec![0u16; len as usize + 1];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buffer) };
    Some(String::from_utf16_lossy(&buffer[..copied.max(0) as usize]))
}

pub fn window_class_name(handle: WindowHandle) -> Option<String> {
    let mut buffer = [0u16; 256];
    let copied = unsafe { GetClassNameW(hwnd(handle), &mut buffer) };
    if copied <= 0 {
        return None;
    }
    Some(String::from_utf16_lossy(&buffer[..copied as usize]))
}

pub fn foreground_window() -> Option<WindowHandle> {
    let hwnd = unsafe { GetForegroundWindow() };
    let raw = hwnd.0 as isize;
    (raw != 0).then_some(WindowHandle(raw))
}

pub fn move_window(handle: WindowHandle, rect: &Rect) -> Result<()> {
    unsafe {
        MoveWindow(
            hwnd(handle),
            rect.left,
            rect.top,
            rect.width(),
            rect.height(),
            TRUE,
        )
    }
    .with_context(|| format!("MoveWindow failed for window {}", handle))
}

pub fn set_topmost(handle: WindowHandle, topmost: bool) -> Result<()> {
    let insert_after = if topmost { HWND_TOPMOST } else { HWND_NOTOPMOST };
    unsafe {
        SetWindowPos(
            hwnd(handle),
            insert_after,
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
        )
    }
    .with_context(|| format!("SetWindowPos failed for window {}", handle))
}
